//! Binary snapshots of a whole game.
//!
//! A snapshot preserves handles, so ids taken before saving still resolve
//! in the restored game.

use crate::core::EfgResult;
use crate::tree::GameTree;

impl GameTree {
    /// Encode the game with `bincode`.
    pub fn to_snapshot(&self) -> EfgResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a game produced by [`GameTree::to_snapshot`].
    pub fn from_snapshot(bytes: &[u8]) -> EfgResult<Self> {
        let game: Self = bincode::deserialize(bytes)?;
        log::debug!("restored game \"{}\" at revision {}", game.title(), game.revision());
        Ok(game)
    }
}
