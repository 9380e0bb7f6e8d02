//! Core building blocks: handles, arenas, players, configuration, errors.
//!
//! Nothing here knows about game trees; the `tree` module builds on these.

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod player;

pub use arena::Arena;
pub use config::{GameConfig, DEFAULT_TITLE};
pub use error::{EfgError, EfgResult};
pub use handle::{ActionId, Handle, InfosetId, NodeId, OutcomeId};
pub use player::{PlayerId, PlayerMap};
