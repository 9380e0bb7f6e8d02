//! Tree-editing primitives: growing, splicing, pruning and relocating
//! subtrees, and keeping member child lists in step with action lists.
//!
//! Each operation validates its handles before touching anything. Edits
//! that would bridge two subgames, or that have nothing to do, return a
//! null or unchanged handle and leave the game (and its revision) alone.

use super::game::GameTree;
use super::traverse;
use crate::core::{ActionId, EfgError, EfgResult, InfosetId, NodeId, PlayerId};

impl GameTree {
    /// Grow terminal `node` into a decision of `player` with `count` actions,
    /// under a fresh infoset.
    ///
    /// A node that already has children is left as is and its current
    /// infoset is returned.
    pub fn append_node(&mut self, node: NodeId, player: PlayerId, count: usize) -> EfgResult<InfosetId> {
        self.check_node(node)?;
        self.check_player(player)?;
        if count == 0 {
            return Err(EfgError::InvalidCount);
        }

        if let Some(existing) = self.nodes[node].infoset {
            return Ok(existing);
        }

        let infoset = self.new_infoset(player, count);
        self.attach_infoset(node, infoset);
        self.touch();
        self.sort_infosets();
        log::debug!("appended {} actions for {} at {}", count, player, node);
        Ok(infoset)
    }

    /// Grow terminal `node` into a member of an existing infoset.
    ///
    /// Returns `None` when `infoset` already has members in a different
    /// subgame. A node that already has children is left as is.
    pub fn append_node_to(&mut self, node: NodeId, infoset: InfosetId) -> EfgResult<Option<InfosetId>> {
        self.check_node(node)?;
        self.check_infoset(infoset)?;

        if self.bridges_subgames(node, infoset) {
            return Ok(None);
        }

        if self.nodes[node].is_terminal() {
            self.attach_infoset(node, infoset);
            self.touch();
            self.sort_infosets();
            log::debug!("appended {} at {}", infoset, node);
        }
        Ok(Some(infoset))
    }

    /// Splice a new decision of `player` with `count` actions between `node`
    /// and its parent. The old subtree becomes the first child.
    pub fn insert_node(&mut self, node: NodeId, player: PlayerId, count: usize) -> EfgResult<InfosetId> {
        self.check_node(node)?;
        self.check_player(player)?;
        if count == 0 {
            return Err(EfgError::InvalidCount);
        }

        let infoset = self.new_infoset(player, count);
        self.splice_above(node, infoset);
        self.touch();
        self.sort_infosets();
        log::debug!("inserted {} actions for {} above {}", count, player, node);
        Ok(infoset)
    }

    /// Splice a new member of `infoset` between `node` and its parent.
    ///
    /// Returns `None` when `infoset` already has members outside the
    /// subgame the new node would belong to. That is the parent's subgame,
    /// or a fresh one when `node` is the game root.
    pub fn insert_node_to(&mut self, node: NodeId, infoset: InfosetId) -> EfgResult<Option<InfosetId>> {
        self.check_node(node)?;
        self.check_infoset(infoset)?;

        if self.splice_bridges_subgames(node, infoset) {
            return Ok(None);
        }

        self.splice_above(node, infoset);
        self.touch();
        self.sort_infosets();
        log::debug!("inserted {} above {}", infoset, node);
        Ok(Some(infoset))
    }

    /// Collapse `node` onto its child `keep`, discarding every other child
    /// subtree. Returns `keep`, which now sits where `node` was.
    ///
    /// If `node` was a subgame root, `keep` becomes one, unless `keep` is a
    /// terminal below the game root: then it joins the parent's subgame.
    pub fn delete_node(&mut self, node: NodeId, keep: NodeId) -> EfgResult<NodeId> {
        self.check_node(node)?;
        self.check_node(keep)?;
        if self.nodes[keep].parent != Some(node) {
            return Err(EfgError::NotAChild);
        }

        if self.nodes[node].gameroot == node {
            let base = match self.nodes[node].parent {
                Some(parent) if self.nodes[keep].is_terminal() => self.nodes[parent].gameroot,
                _ => keep,
            };
            self.nodes[keep].gameroot = base;
            self.propagate_subgame(keep, base);
        }

        self.batch(|game| {
            game.nodes[node].children.retain(|c| *c != keep);
            game.prune(node);

            let parent = game.nodes[node].parent;
            game.nodes[keep].parent = parent;
            match parent {
                Some(parent) => {
                    let position = game
                        .child_position(parent, node)
                        .expect("parent lists deleted node");
                    game.nodes[parent].children[position] = keep;
                }
                None => game.root = keep,
            }
            game.nodes.free(node);
            game.touch();
        });
        log::debug!("deleted {} keeping {}", node, keep);
        Ok(keep)
    }

    /// Copy the structure below `src` onto terminal `dest`.
    ///
    /// Copied nodes join the same infosets as their originals and keep
    /// names and outcomes. Returns `dest`, or `src` unchanged when `dest`
    /// is `src`, is not terminal or lies in another subgame, and when a
    /// subgame root is nested below `src`.
    pub fn copy_tree(&mut self, src: NodeId, dest: NodeId) -> EfgResult<NodeId> {
        self.check_node(src)?;
        self.check_node(dest)?;
        if src == dest || !self.nodes[dest].is_terminal() {
            return Ok(src);
        }
        if self.nodes[src].gameroot != self.nodes[dest].gameroot {
            return Ok(src);
        }
        if traverse::subtree(self, src)
            .into_iter()
            .skip(1)
            .any(|n| self.nodes[n].gameroot == n)
        {
            return Ok(src);
        }

        if let Some(infoset) = self.nodes[src].infoset {
            self.batch(|game| {
                game.attach_infoset(dest, infoset);
                let pairs: Vec<_> = game.nodes[src]
                    .children
                    .iter()
                    .copied()
                    .zip(game.nodes[dest].children.iter().copied())
                    .collect();
                for (from, to) in pairs {
                    game.copy_subtree(from, to, dest);
                }
                game.touch();
            });
            log::debug!("copied subtree at {} onto {}", src, dest);
        }
        Ok(dest)
    }

    /// Move the subtree at `src` to the position of terminal `dest`; `dest`
    /// takes the old position of `src` with its name and outcome cleared.
    ///
    /// Returns `dest`, or `src` unchanged when `dest` is `src`, is not
    /// terminal, lies inside the subtree at `src`, or in another subgame.
    pub fn move_tree(&mut self, src: NodeId, dest: NodeId) -> EfgResult<NodeId> {
        self.check_node(src)?;
        self.check_node(dest)?;
        if src == dest || !self.nodes[dest].is_terminal() || self.is_predecessor(src, dest) {
            return Ok(src);
        }
        if self.nodes[src].gameroot != self.nodes[dest].gameroot {
            return Ok(src);
        }

        // Neither is the root: the root is a predecessor of everything, and
        // a terminal root would equal `src`.
        let src_parent = self.nodes[src].parent.expect("non-root node has a parent");
        let dest_parent = self.nodes[dest].parent.expect("non-root node has a parent");
        let src_position = self.child_position(src_parent, src).expect("parent lists child");
        let dest_position = self.child_position(dest_parent, dest).expect("parent lists child");

        self.nodes[src_parent].children[src_position] = dest;
        self.nodes[dest_parent].children[dest_position] = src;
        self.nodes[src].parent = Some(dest_parent);
        self.nodes[dest].parent = Some(src_parent);

        self.nodes[dest].name.clear();
        self.nodes[dest].outcome = None;

        self.touch();
        self.sort_infosets();
        log::debug!("moved subtree at {} to {}", src, dest);
        Ok(dest)
    }

    /// Discard every descendant of `node`, detach it from its infoset and
    /// clear its name and outcome. The node itself stays as a terminal, so
    /// a subgame mark on it folds into the parent's subgame.
    pub fn delete_tree(&mut self, node: NodeId) -> EfgResult<NodeId> {
        self.check_node(node)?;
        self.prune(node);
        if let Some(parent) = self.nodes[node].parent {
            if self.nodes[node].gameroot == node {
                self.nodes[node].gameroot = self.nodes[parent].gameroot;
            }
        }
        self.touch();
        self.sort_infosets();
        log::debug!("deleted subtree at {}", node);
        Ok(node)
    }

    /// Append an action to `infoset`, growing a terminal child on every member.
    pub fn insert_action(&mut self, infoset: InfosetId) -> EfgResult<ActionId> {
        self.check_infoset(infoset)?;
        let position = self.infosets[infoset].num_actions();
        let action = self.insert_action_at_position(infoset, position);
        log::debug!("appended action to {}", infoset);
        Ok(action)
    }

    /// Insert an action into `infoset` before `at`, growing a terminal child
    /// at the same position on every member.
    pub fn insert_action_before(&mut self, infoset: InfosetId, at: ActionId) -> EfgResult<ActionId> {
        self.check_infoset(infoset)?;
        self.check_action(at)?;
        let position = self.infosets[infoset]
            .position(at)
            .ok_or(EfgError::ForeignAction)?;
        let action = self.insert_action_at_position(infoset, position - 1);
        log::debug!("inserted action {} into {}", position, infoset);
        Ok(action)
    }

    /// Remove `action` from `infoset` together with the subtree it leads to
    /// on every member. The last remaining action is never removed.
    pub fn delete_action(&mut self, infoset: InfosetId, action: ActionId) -> EfgResult<InfosetId> {
        self.check_infoset(infoset)?;
        self.check_action(action)?;
        let position = self.infosets[infoset]
            .position(action)
            .ok_or(EfgError::ForeignAction)?;
        if self.infosets[infoset].num_actions() == 1 {
            return Ok(infoset);
        }

        let index = position - 1;
        self.batch(|game| {
            let data = &mut game.infosets[infoset];
            data.actions.remove(index);
            if data.is_chance() {
                data.probs.remove(index);
            }
            game.actions.free(action);

            for member in game.infosets[infoset].members.clone() {
                let child = game.nodes[member].children.remove(index);
                game.prune(child);
                game.nodes.free(child);
            }
            game.touch();
        });
        log::debug!("deleted action {} of {}", position, infoset);
        Ok(infoset)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// True when `infoset` has members whose subgame differs from `node`'s.
    pub(crate) fn bridges_subgames(&self, node: NodeId, infoset: InfosetId) -> bool {
        self.infosets[infoset]
            .members
            .first()
            .is_some_and(|&m| self.nodes[m].gameroot != self.nodes[node].gameroot)
    }

    /// True when `infoset` has members outside the subgame a node spliced
    /// above `node` would join.
    fn splice_bridges_subgames(&self, node: NodeId, infoset: InfosetId) -> bool {
        let Some(&first) = self.infosets[infoset].members.first() else {
            return false;
        };
        match self.nodes[node].parent {
            Some(parent) => self.nodes[parent].gameroot != self.nodes[first].gameroot,
            None => true,
        }
    }

    /// Put a new member of `infoset` in place of `node`, with `node` as its
    /// first child.
    fn splice_above(&mut self, node: NodeId, infoset: InfosetId) {
        let parent = self.nodes[node].parent;
        let fresh = match parent {
            Some(parent) => self.alloc_node(parent),
            None => {
                let fresh = self.nodes.alloc(super::node::Node::new(None, node));
                self.nodes[fresh].gameroot = fresh;
                // The old root keeps its mark unless it is terminal
                if self.nodes[node].is_terminal() {
                    self.nodes[node].gameroot = fresh;
                }
                fresh
            }
        };
        match parent {
            Some(parent) => {
                let position = self.child_position(parent, node).expect("parent lists child");
                self.nodes[parent].children[position] = fresh;
            }
            None => self.root = fresh,
        }

        self.nodes[fresh].infoset = Some(infoset);
        self.infosets[infoset].members.push(fresh);
        self.nodes[fresh].children.push(node);
        self.nodes[node].parent = Some(fresh);
        for _ in 1..self.infosets[infoset].num_actions() {
            let child = self.alloc_node(fresh);
            self.nodes[fresh].children.push(child);
        }
    }

    fn insert_action_at_position(&mut self, infoset: InfosetId, index: usize) -> ActionId {
        let action = self.actions.alloc(super::infoset::Action {
            infoset,
            label: String::new(),
        });
        let data = &mut self.infosets[infoset];
        data.actions.insert(index, action);
        if data.is_chance() {
            data.probs.insert(index, 0.0);
        }
        for member in self.infosets[infoset].members.clone() {
            let child = self.alloc_node(member);
            self.nodes[member].children.insert(index, child);
        }
        self.touch();
        self.sort_infosets();
        action
    }

    /// Free every descendant of `node`, detach it from its infoset and
    /// clear its name and outcome.
    pub(crate) fn prune(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node].children);
        let mut stack: Vec<NodeId> = children.into_iter().collect();
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.free(id) {
                if let Some(s) = removed.infoset {
                    self.infosets[s].members.retain(|&m| m != id);
                }
                stack.extend(removed.children);
            }
        }

        let data = &mut self.nodes[node];
        data.outcome = None;
        data.name.clear();
        if let Some(s) = data.infoset.take() {
            self.infosets[s].members.retain(|&m| m != node);
        }
    }

    /// Copy the subtree at `from` onto terminal `to`. Stops at `stop`
    /// (the copy target) so copying a node into its own subtree terminates.
    fn copy_subtree(&mut self, from: NodeId, to: NodeId, stop: NodeId) {
        let mut stack = vec![(from, to)];
        while let Some((from, to)) = stack.pop() {
            if from == stop {
                self.nodes[to].outcome = self.nodes[from].outcome;
                continue;
            }
            if let Some(infoset) = self.nodes[from].infoset {
                self.attach_infoset(to, infoset);
                let pairs: Vec<_> = self.nodes[from]
                    .children
                    .iter()
                    .copied()
                    .zip(self.nodes[to].children.iter().copied())
                    .collect();
                stack.extend(pairs);
            }
            self.nodes[to].name = self.nodes[from].name.clone();
            self.nodes[to].outcome = self.nodes[from].outcome;
        }
    }
}
