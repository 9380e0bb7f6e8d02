//! # rust-efg
//!
//! An editable extensive-form game tree.
//!
//! ## Design Principles
//!
//! 1. **Handles, not pointers**: Nodes, infosets, actions and outcomes live
//!    in generational arenas owned by `GameTree`. Everything outside refers
//!    to them through typed handles that stop resolving once freed.
//!
//! 2. **Invariants after every edit**: Each editing operation restores
//!    dense preorder numbering and infoset membership before it returns.
//!    `batch` defers that work to the end of a sequence of edits.
//!
//! 3. **Two tiers of failure**: Invalid handles and counts are errors.
//!    Legality rejections (bridging subgames, no-op edits) are ordinary
//!    return values and leave the revision untouched.
//!
//! ## Architecture
//!
//! - **Revision counter**: Every applied edit bumps `GameTree::revision`.
//!   Derived representations keep a `DerivedCache` stamped with the
//!   revision they were built at and rebuild lazily.
//!
//! - **Chance player**: `PlayerId::CHANCE` owns chance infosets, which
//!   carry one probability per action. No normalization is enforced.
//!
//! ## Modules
//!
//! - `core`: Handles, arenas, players, configuration, errors
//! - `tree`: The game tree, editing, infoset lifecycle, subgames
//! - `eval`: Payoffs and reach probabilities under pure profiles
//! - `io`: `.efg` writer and binary snapshots
//! - `cache`: Revision-stamped derived data

pub mod cache;
pub mod core;
pub mod eval;
pub mod io;
pub mod tree;

// Re-export commonly used types
pub use crate::core::{
    ActionId, EfgError, EfgResult, GameConfig, InfosetId, NodeId, OutcomeId, PlayerId, PlayerMap,
};

pub use crate::tree::{traverse, Action, GameTree, Infoset, Node, Outcome, Player};

pub use crate::eval::PureProfile;

pub use crate::cache::DerivedCache;
