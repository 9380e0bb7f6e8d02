//! Subgame legality and marking.
//!
//! Every node carries the root of the innermost marked subgame containing
//! it. The game root is always marked. Marking never changes the game's
//! structure, so none of these operations bump the revision.

use rustc_hash::FxHashSet;

use super::game::GameTree;
use super::traverse;
use crate::core::{EfgResult, NodeId};

impl GameTree {
    /// Check whether the subtree at `node` is closed under infosets: every
    /// personal infoset met inside has all of its members inside.
    ///
    /// Terminal nodes never root a legal subgame.
    pub fn is_legal_subgame(&self, node: NodeId) -> EfgResult<bool> {
        if self.check_node(node)?.is_terminal() {
            return Ok(false);
        }
        let inside: FxHashSet<NodeId> = traverse::subtree(self, node).into_iter().collect();
        let closed = inside.iter().all(|&n| match self.nodes[n].infoset {
            Some(s) if !self.infosets[s].is_chance() => {
                self.infosets[s].members.iter().all(|m| inside.contains(m))
            }
            _ => true,
        });
        Ok(closed)
    }

    /// Mark `node` as a subgame root if it roots a legal subgame.
    ///
    /// Returns true when `node` is marked afterwards.
    pub fn mark_subgame(&mut self, node: NodeId) -> EfgResult<bool> {
        self.check_node(node)?;
        if self.nodes[node].gameroot == node {
            return Ok(true);
        }
        if !self.is_legal_subgame(node)? {
            return Ok(false);
        }
        self.nodes[node].gameroot = node;
        self.propagate_subgame(node, node);
        log::debug!("marked subgame at {}", node);
        Ok(true)
    }

    /// Remove the subgame mark on `node`, folding it into the enclosing
    /// subgame. The game root stays marked.
    pub fn unmark_subgame(&mut self, node: NodeId) -> EfgResult<()> {
        self.check_node(node)?;
        if self.nodes[node].gameroot != node {
            return Ok(());
        }
        let Some(parent) = self.nodes[node].parent else {
            return Ok(());
        };
        let base = self.nodes[parent].gameroot;
        self.nodes[node].gameroot = base;
        self.propagate_subgame(node, base);
        log::debug!("unmarked subgame at {}", node);
        Ok(())
    }

    /// Mark every node that roots a legal subgame.
    pub fn mark_subgames(&mut self) -> usize {
        let roots = traverse::legal_subgame_roots(self);
        let mut marked = 0;
        for n in roots {
            if self.nodes[n].gameroot != n {
                self.nodes[n].gameroot = n;
                self.propagate_subgame(n, n);
                marked += 1;
            }
        }
        log::debug!("marked {} subgames", marked);
        marked
    }

    /// Remove every subgame mark strictly below `node`, and on `node` itself
    /// unless it is the game root.
    pub fn unmark_subgames(&mut self, node: NodeId) -> EfgResult<()> {
        self.check_node(node)?;
        // Deepest first so each unmark folds into a still-marked ancestor
        for n in traverse::subtree(self, node).into_iter().rev() {
            self.unmark_subgame(n)?;
        }
        Ok(())
    }

    /// Set the subgame of every descendant of `from` to `base`, stopping at
    /// nested subgame roots.
    pub(crate) fn propagate_subgame(&mut self, from: NodeId, base: NodeId) {
        let mut stack: Vec<NodeId> = self.nodes[from].children.to_vec();
        while let Some(n) = stack.pop() {
            if self.nodes[n].gameroot == n {
                continue;
            }
            self.nodes[n].gameroot = base;
            stack.extend(self.nodes[n].children.iter().copied());
        }
    }
}
