//! Revision-stamped caches for representations derived from a game.

mod revision;

pub use revision::DerivedCache;
