//! Information sets, actions, players and outcomes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ActionId, InfosetId, NodeId, PlayerId, PlayerMap};

/// An information set: ordered actions plus ordered member nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Infoset {
    pub(crate) player: PlayerId,
    pub(crate) label: String,
    pub(crate) actions: SmallVec<[ActionId; 4]>,
    /// One probability per action; empty for personal infosets.
    pub(crate) probs: SmallVec<[f64; 4]>,
    /// Members in preorder once the game is reindexed.
    pub(crate) members: Vec<NodeId>,
    pub(crate) number: usize,
}

impl Infoset {
    pub(crate) fn new(player: PlayerId, number: usize) -> Self {
        Self {
            player,
            label: String::new(),
            actions: SmallVec::new(),
            probs: SmallVec::new(),
            members: Vec::new(),
            number,
        }
    }

    /// Owning player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Check if chance owns this infoset.
    #[must_use]
    pub fn is_chance(&self) -> bool {
        self.player.is_chance()
    }

    /// The infoset's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Actions in order.
    #[must_use]
    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    /// Number of actions.
    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    /// Action at 1-based position `i`.
    #[must_use]
    pub fn action(&self, i: usize) -> Option<ActionId> {
        i.checked_sub(1).and_then(|i| self.actions.get(i).copied())
    }

    /// 1-based position of `action`, if it belongs here.
    #[must_use]
    pub fn position(&self, action: ActionId) -> Option<usize> {
        self.actions.iter().position(|&a| a == action).map(|i| i + 1)
    }

    /// Chance probabilities, one per action (empty for personal infosets).
    #[must_use]
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Member nodes.
    #[must_use]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Number of member nodes.
    #[must_use]
    pub fn num_members(&self) -> usize {
        self.members.len()
    }

    /// Dense number within the owning player's infoset list, 1-based.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }
}

/// One labeled branch of an information set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Action {
    pub(crate) infoset: InfosetId,
    pub(crate) label: String,
}

impl Action {
    /// Owning infoset.
    #[must_use]
    pub fn infoset(&self) -> InfosetId {
        self.infoset
    }

    /// The action's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A player and the ordered list of infosets it owns.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Player {
    pub(crate) label: String,
    pub(crate) infosets: Vec<InfosetId>,
}

impl Player {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            infosets: Vec::new(),
        }
    }

    /// The player's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Owned infosets; empty ones trail once the game is reindexed.
    #[must_use]
    pub fn infosets(&self) -> &[InfosetId] {
        &self.infosets
    }

    /// Number of owned infosets.
    #[must_use]
    pub fn num_infosets(&self) -> usize {
        self.infosets.len()
    }
}

/// A named payoff vector shared by any number of nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Outcome {
    pub(crate) label: String,
    pub(crate) payoffs: PlayerMap<f64>,
    pub(crate) number: usize,
}

impl Outcome {
    pub(crate) fn new(player_count: usize, number: usize) -> Self {
        Self {
            label: String::new(),
            payoffs: PlayerMap::with_value(player_count, 0.0),
            number,
        }
    }

    /// The outcome's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Payoffs, one per personal player.
    #[must_use]
    pub fn payoffs(&self) -> &PlayerMap<f64> {
        &self.payoffs
    }

    /// Dense number, 1-based.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Handle;

    #[test]
    fn test_infoset_positions() {
        let mut infoset = Infoset::new(PlayerId::new(1), 1);
        let a = ActionId::from_parts(0, 0);
        let b = ActionId::from_parts(1, 0);
        infoset.actions.push(a);
        infoset.actions.push(b);

        assert_eq!(infoset.num_actions(), 2);
        assert_eq!(infoset.action(1), Some(a));
        assert_eq!(infoset.position(b), Some(2));
        assert_eq!(infoset.position(ActionId::from_parts(9, 0)), None);
        assert!(!infoset.is_chance());
    }

    #[test]
    fn test_outcome_starts_at_zero() {
        let outcome = Outcome::new(3, 1);
        assert_eq!(outcome.payoffs().player_count(), 3);
        assert!(outcome.payoffs().values().all(|&v| v == 0.0));
    }
}
