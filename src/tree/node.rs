//! Tree vertices.
//!
//! A node is either terminal (no children, no infoset) or interior (one
//! infoset, exactly as many children as that infoset has actions). The
//! infoset and outcome links are non-owning handles; children are owned
//! through the game's node arena.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{InfosetId, NodeId, OutcomeId};

/// A node of the game tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    /// Optional label.
    pub(crate) name: String,

    /// Parent node (None for root).
    pub(crate) parent: Option<NodeId>,

    /// Children in action order.
    /// SmallVec optimizes for typical branching factor <= 4.
    pub(crate) children: SmallVec<[NodeId; 4]>,

    /// Information set (interior nodes only).
    pub(crate) infoset: Option<InfosetId>,

    /// Attached outcome.
    pub(crate) outcome: Option<OutcomeId>,

    /// Root of the subgame governing this node; equal to the node's own
    /// handle when it is a marked subgame root.
    pub(crate) gameroot: NodeId,

    /// Dense preorder number, 1-based.
    pub(crate) number: usize,
}

impl Node {
    pub(crate) fn new(parent: Option<NodeId>, gameroot: NodeId) -> Self {
        Self {
            name: String::new(),
            parent,
            children: SmallVec::new(),
            infoset: None,
            outcome: None,
            gameroot,
            number: 0,
        }
    }

    /// The node's label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node, or None for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in action order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of children.
    #[must_use]
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Child reached by the action at 1-based position `i`.
    #[must_use]
    pub fn child(&self, i: usize) -> Option<NodeId> {
        i.checked_sub(1).and_then(|i| self.children.get(i).copied())
    }

    /// Information set, None for terminal nodes.
    #[must_use]
    pub fn infoset(&self) -> Option<InfosetId> {
        self.infoset
    }

    /// Attached outcome, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<OutcomeId> {
        self.outcome
    }

    /// Root of the governing subgame.
    #[must_use]
    pub fn subgame_root(&self) -> NodeId {
        self.gameroot
    }

    /// Dense preorder number, 1-based.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Check if this is a terminal node.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Handle;

    #[test]
    fn test_new_node_is_terminal() {
        let root = NodeId::from_parts(0, 0);
        let node = Node::new(None, root);

        assert!(node.is_terminal());
        assert!(node.parent().is_none());
        assert!(node.infoset().is_none());
        assert!(node.outcome().is_none());
        assert_eq!(node.subgame_root(), root);
        assert_eq!(node.name(), "");
    }

    #[test]
    fn test_child_is_one_based() {
        let root = NodeId::from_parts(0, 0);
        let mut node = Node::new(None, root);
        node.children.push(NodeId::from_parts(1, 0));
        node.children.push(NodeId::from_parts(2, 0));

        assert_eq!(node.child(0), None);
        assert_eq!(node.child(1), Some(NodeId::from_parts(1, 0)));
        assert_eq!(node.child(2), Some(NodeId::from_parts(2, 0)));
        assert_eq!(node.child(3), None);
        assert_eq!(node.num_children(), 2);
    }
}
