//! Error types.
//!
//! Only hard failures are errors: handles that do not resolve, invalid
//! counts, actions used with the wrong infoset. Legality rejections such
//! as bridging two subgames are ordinary return values (`Ok(None)` or the
//! unchanged handle) because callers are expected to branch on them.

use thiserror::Error;

use super::player::PlayerId;

/// Hard failure of a game operation. The game is unchanged when returned.
#[derive(Debug, Error)]
pub enum EfgError {
    #[error("{kind} handle does not belong to this game")]
    InvalidHandle { kind: &'static str },

    #[error("{0} does not exist in this game")]
    InvalidPlayer(PlayerId),

    #[error("action count must be positive")]
    InvalidCount,

    #[error("action does not belong to the given infoset")]
    ForeignAction,

    #[error("node to keep is not a child of the node being deleted")]
    NotAChild,

    #[error("infosets cannot be switched to or from the chance player")]
    ChanceSwitch,

    #[error("infoset does not belong to the chance player")]
    NotChance,

    #[error("profile does not match the shape of the game")]
    ProfileMismatch,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

/// Result alias used throughout the crate.
pub type EfgResult<T> = Result<T, EfgError>;
