//! Pure strategy profiles.

use serde::{Deserialize, Serialize};

use crate::core::{ActionId, EfgError, EfgResult, Handle, InfosetId, PlayerId, PlayerMap};
use crate::tree::GameTree;

/// One chosen action per personal infoset.
///
/// Choices are stored as 1-based action positions, indexed by player and
/// infoset number, so a profile stays meaningful across edits that keep
/// the game's shape. Evaluating a profile whose shape no longer matches
/// the game fails with [`EfgError::ProfileMismatch`].
///
/// ```
/// use rust_efg::core::{GameConfig, PlayerId};
/// use rust_efg::eval::PureProfile;
/// use rust_efg::tree::GameTree;
///
/// let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
/// let root = game.root();
/// let infoset = game.append_node(root, PlayerId::new(1), 3).unwrap();
///
/// let mut profile = PureProfile::new(&game);
/// let third = game.infoset(infoset).unwrap().action(3).unwrap();
/// profile.set(&game, third).unwrap();
/// assert_eq!(profile.action(&game, infoset).unwrap(), third);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PureProfile {
    choices: PlayerMap<Vec<usize>>,
}

impl PureProfile {
    /// Create a profile choosing the first action everywhere.
    #[must_use]
    pub fn new(game: &GameTree) -> Self {
        let choices: Vec<Vec<usize>> = game
            .num_actions()
            .values()
            .map(|counts| vec![1; counts.len()])
            .collect();
        Self {
            choices: PlayerMap::from(choices),
        }
    }

    /// Choose `action` at its infoset.
    pub fn set(&mut self, game: &GameTree, action: ActionId) -> EfgResult<()> {
        let infoset_id = game
            .action(action)
            .ok_or(EfgError::InvalidHandle { kind: ActionId::KIND })?
            .infoset();
        let infoset = game
            .infoset(infoset_id)
            .ok_or(EfgError::InvalidHandle { kind: InfosetId::KIND })?;
        let player = infoset.player();
        if player.is_chance() {
            return Err(EfgError::InvalidPlayer(player));
        }
        let position = infoset.position(action).ok_or(EfgError::ForeignAction)?;
        let slot = self.slot_mut(player, infoset.number())?;
        *slot = position;
        Ok(())
    }

    /// The action chosen at `infoset`.
    pub fn action(&self, game: &GameTree, infoset: InfosetId) -> EfgResult<ActionId> {
        let data = game
            .infoset(infoset)
            .ok_or(EfgError::InvalidHandle { kind: InfosetId::KIND })?;
        if data.is_chance() {
            return Err(EfgError::InvalidPlayer(PlayerId::CHANCE));
        }
        let position = self.choice(data.player(), data.number())?;
        data.action(position).ok_or(EfgError::ProfileMismatch)
    }

    /// The 1-based action position chosen at a player's infoset number.
    pub fn choice(&self, player: PlayerId, infoset_number: usize) -> EfgResult<usize> {
        if !self.choices.contains(player) {
            return Err(EfgError::ProfileMismatch);
        }
        infoset_number
            .checked_sub(1)
            .and_then(|i| self.choices[player].get(i))
            .copied()
            .ok_or(EfgError::ProfileMismatch)
    }

    /// Check that the profile has one valid choice per infoset of `game`.
    pub fn check_shape(&self, game: &GameTree) -> EfgResult<()> {
        let counts = game.num_actions();
        if counts.player_count() != self.choices.player_count() {
            return Err(EfgError::ProfileMismatch);
        }
        for (player, actions) in counts.iter() {
            let chosen = &self.choices[player];
            let fits = chosen.len() == actions.len()
                && chosen.iter().zip(actions).all(|(&c, &n)| (1..=n).contains(&c));
            if !fits {
                return Err(EfgError::ProfileMismatch);
            }
        }
        Ok(())
    }

    fn slot_mut(&mut self, player: PlayerId, infoset_number: usize) -> EfgResult<&mut usize> {
        if !self.choices.contains(player) {
            return Err(EfgError::ProfileMismatch);
        }
        infoset_number
            .checked_sub(1)
            .and_then(|i| self.choices[player].get_mut(i))
            .ok_or(EfgError::ProfileMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_defaults_to_first_action() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A").with_player("B"));
        let root = game.root();
        game.append_node(root, PlayerId::new(2), 2).unwrap();

        let profile = PureProfile::new(&game);

        assert_eq!(profile.choice(PlayerId::new(2), 1).unwrap(), 1);
        assert!(profile.choice(PlayerId::new(1), 1).is_err());
        assert!(profile.check_shape(&game).is_ok());
    }

    #[test]
    fn test_shape_mismatch_after_edit() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
        let root = game.root();
        game.append_node(root, PlayerId::new(1), 2).unwrap();
        let profile = PureProfile::new(&game);

        let child = game.node(root).unwrap().child(1).unwrap();
        game.append_node(child, PlayerId::new(1), 2).unwrap();

        assert!(matches!(profile.check_shape(&game), Err(EfgError::ProfileMismatch)));
    }

    #[test]
    fn test_chance_actions_rejected() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
        let root = game.root();
        let chance = game.append_node(root, PlayerId::CHANCE, 2).unwrap();
        let mut profile = PureProfile::new(&game);
        let action = game.infoset(chance).unwrap().action(1).unwrap();

        assert!(matches!(profile.set(&game, action), Err(EfgError::InvalidPlayer(_))));
    }

    #[test]
    fn test_serialization() {
        let mut game = GameTree::from_config(GameConfig::default().with_player("A"));
        let root = game.root();
        game.append_node(root, PlayerId::new(1), 2).unwrap();
        let profile = PureProfile::new(&game);

        let json = serde_json::to_string(&profile).unwrap();
        let restored: PureProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, restored);
    }
}
