//! Invariant restoration after structural edits.
//!
//! After every edit, for each player (chance included):
//! - infosets are numbered 1..k in order of first preorder encounter,
//! - infosets without members trail the list, keeping their relative order,
//! - member lists are exactly the referencing nodes, in preorder,
//!
//! and nodes are numbered 1..N in preorder. The result depends only on the
//! tree shape, so running the pass twice yields the same numbering.

use rustc_hash::FxHashSet;

use super::game::GameTree;
use super::traverse;
use crate::core::{InfosetId, PlayerId};

impl GameTree {
    /// Renumber infosets, members and nodes. Skipped inside `batch`.
    pub(crate) fn sort_infosets(&mut self) {
        if self.suppress_reindex > 0 {
            return;
        }

        let order = traverse::nodes(self);

        for player in std::iter::once(PlayerId::CHANCE).chain(self.player_ids()) {
            let mut seen: FxHashSet<InfosetId> = FxHashSet::default();
            let mut sorted = Vec::with_capacity(self.player_data(player).infosets.len());
            for &n in &order {
                if let Some(s) = self.nodes[n].infoset {
                    if self.infosets[s].player == player && seen.insert(s) {
                        sorted.push(s);
                    }
                }
            }
            let empty: Vec<_> = self
                .player_data(player)
                .infosets
                .iter()
                .copied()
                .filter(|s| !seen.contains(s))
                .collect();
            assert_eq!(
                sorted.len() + empty.len(),
                self.player_data(player).infosets.len(),
                "infoset reachable from the tree is missing from {}'s list",
                player
            );
            sorted.extend(empty);
            for (i, &s) in sorted.iter().enumerate() {
                self.infosets[s].number = i + 1;
                self.infosets[s].members.clear();
            }
            self.player_data_mut(player).infosets = sorted;
        }

        for (i, &n) in order.iter().enumerate() {
            let node = &mut self.nodes[n];
            node.number = i + 1;
            if let Some(s) = node.infoset {
                let children = node.children.len();
                let infoset = &mut self.infosets[s];
                assert_eq!(
                    infoset.actions.len(),
                    children,
                    "{} has {} actions but member {} has {} children",
                    s,
                    infoset.actions.len(),
                    n,
                    children
                );
                infoset.members.push(n);
            }
        }

        log::trace!("reindexed {} nodes", order.len());
    }

    /// Number every player's infosets and every outcome by list position.
    pub fn reindex(&mut self) {
        for player in std::iter::once(PlayerId::CHANCE).chain(self.player_ids()) {
            let list = self.player_data(player).infosets.clone();
            for (i, s) in list.into_iter().enumerate() {
                self.infosets[s].number = i + 1;
            }
        }
        self.reindex_outcomes();
    }

    /// Run a sequence of edits with reindexing suppressed, then reindex once.
    ///
    /// Inside the scope member lists stay correct but their order and all
    /// dense numbers may be stale. Scopes nest; only the outermost one
    /// reindexes.
    ///
    /// ```
    /// use rust_efg::tree::GameTree;
    /// use rust_efg::core::{GameConfig, PlayerId};
    ///
    /// let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
    /// let root = game.root();
    /// game.append_node(root, PlayerId::new(1), 3).unwrap();
    /// let children = game.node(root).unwrap().children().to_vec();
    ///
    /// game.batch(|g| {
    ///     for &child in &children {
    ///         g.append_node(child, PlayerId::new(1), 2).unwrap();
    ///     }
    /// });
    /// assert_eq!(game.num_nodes(), 10);
    /// assert_eq!(game.node(children[2]).unwrap().number(), 8);
    /// ```
    pub fn batch<R>(&mut self, edits: impl FnOnce(&mut Self) -> R) -> R {
        self.suppress_reindex += 1;
        let result = edits(self);
        self.suppress_reindex -= 1;
        self.sort_infosets();
        result
    }

    /// Check whether reindexing is currently suppressed.
    #[must_use]
    pub fn is_batching(&self) -> bool {
        self.suppress_reindex > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    fn numbering(game: &GameTree) -> Vec<(usize, Vec<usize>)> {
        traverse::nodes(game)
            .into_iter()
            .map(|n| {
                let node = game.node(n).unwrap();
                let infoset = node
                    .infoset()
                    .map(|s| vec![game.infoset(s).unwrap().number()])
                    .unwrap_or_default();
                (node.number(), infoset)
            })
            .collect()
    }

    #[test]
    fn test_empty_infosets_trail() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
        let p = PlayerId::new(1);
        let empty = game.create_infoset(p, 2).unwrap();
        let root = game.root();
        let used = game.append_node(root, p, 2).unwrap();

        assert_eq!(game.player(p).unwrap().infosets(), &[used, empty]);
        assert_eq!(game.infoset(used).unwrap().number(), 1);
        assert_eq!(game.infoset(empty).unwrap().number(), 2);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
        let p = PlayerId::new(1);
        let root = game.root();
        game.append_node(root, p, 2).unwrap();
        let right = game.node(root).unwrap().child(2).unwrap();
        game.append_node(right, PlayerId::CHANCE, 3).unwrap();

        let first = numbering(&game);
        game.sort_infosets();
        let second = numbering(&game);

        assert_eq!(first, second);
        assert_eq!(first.iter().map(|(n, _)| *n).collect::<Vec<_>>(), (1..=6).collect::<Vec<_>>());
    }

    #[test]
    fn test_batch_defers_numbering() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
        let root = game.root();

        game.batch(|g| {
            g.append_node(root, PlayerId::new(1), 2).unwrap();
            assert!(g.is_batching());
            let child = g.node(root).unwrap().child(1).unwrap();
            assert_eq!(g.node(child).unwrap().number(), 0);
        });

        assert!(!game.is_batching());
        let child = game.node(root).unwrap().child(1).unwrap();
        assert_eq!(game.node(child).unwrap().number(), 2);
    }

    #[test]
    fn test_reindex_numbers_by_position() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
        let a = game.new_outcome();
        let b = game.new_outcome();
        game.reindex();
        assert_eq!(game.outcome(a).unwrap().number(), 1);
        assert_eq!(game.outcome(b).unwrap().number(), 2);
    }
}
