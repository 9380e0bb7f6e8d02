//! Read-only enumeration over the tree.
//!
//! These are pure functions of the public accessors. Reindexing uses
//! `nodes` as its canonical preorder and `mark_subgames` uses
//! `legal_subgame_roots`.

use super::game::GameTree;
use crate::core::NodeId;

/// Every node in preorder: a node, then each child subtree in action order.
#[must_use]
pub fn nodes(game: &GameTree) -> Vec<NodeId> {
    subtree(game, game.root())
}

/// Every node of the subtree rooted at `from`, in preorder.
///
/// Returns an empty list when `from` does not resolve.
#[must_use]
pub fn subtree(game: &GameTree, from: NodeId) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(game.num_nodes());
    if game.node(from).is_none() {
        return order;
    }
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
        order.push(id);
        if let Some(node) = game.node(id) {
            stack.extend(node.children().iter().rev().copied());
        }
    }
    order
}

/// Terminal nodes in preorder.
#[must_use]
pub fn terminal_nodes(game: &GameTree) -> Vec<NodeId> {
    nodes(game)
        .into_iter()
        .filter(|&n| game.node(n).is_some_and(|n| n.is_terminal()))
        .collect()
}

/// Every node rooting a legal subgame, in preorder.
#[must_use]
pub fn legal_subgame_roots(game: &GameTree) -> Vec<NodeId> {
    nodes(game)
        .into_iter()
        .filter(|&n| game.is_legal_subgame(n).unwrap_or(false))
        .collect()
}
