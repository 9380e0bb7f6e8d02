//! The game tree and its editing operations.
//!
//! - `game`: `GameTree`, arenas, players, outcomes, labels and counting
//! - `edit`: growing, splicing, pruning and relocating subtrees; actions
//! - `membership`: infoset lifecycle and `reveal`
//! - `reindex`: renumbering after edits and the `batch` scope
//! - `subgame`: legality checks and subgame marking
//! - `traverse`: preorder enumeration

mod edit;
mod game;
mod infoset;
mod membership;
mod node;
mod reindex;
mod subgame;
pub mod traverse;

pub use game::GameTree;
pub use infoset::{Action, Infoset, Outcome, Player};
pub use node::Node;
