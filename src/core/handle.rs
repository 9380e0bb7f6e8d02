//! Typed handles into the game's arenas.
//!
//! Every node, information set, action and outcome is addressed by a
//! handle made of an arena slot index and the generation of that slot.
//! Freeing a slot bumps its generation, so a handle kept across a
//! deletion no longer resolves instead of aliasing a new object.
//!
//! Handles are stable across edits. The dense numbers written to files
//! (`Node::number`, `Infoset::number`, ...) are not: they are recomputed
//! after every structural edit.

use serde::{Deserialize, Serialize};

/// Common surface of arena handles.
pub trait Handle: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    /// Build a handle from raw parts.
    fn from_parts(index: u32, generation: u32) -> Self;

    /// Slot index in the arena.
    fn index(self) -> u32;

    /// Generation of the slot when the handle was issued.
    fn generation(self) -> u32;
}

macro_rules! define_handle {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl Handle for $name {
            const KIND: &'static str = $kind;

            #[inline]
            fn from_parts(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            #[inline]
            fn index(self) -> u32 {
                self.index
            }

            #[inline]
            fn generation(self) -> u32 {
                self.generation
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}v{})", stringify!($name), self.index, self.generation)
            }
        }
    };
}

define_handle!(
    /// Handle to a node of the game tree.
    NodeId,
    "node"
);

define_handle!(
    /// Handle to an information set.
    InfosetId,
    "infoset"
);

define_handle!(
    /// Handle to an action of an information set.
    ActionId,
    "action"
);

define_handle!(
    /// Handle to an outcome.
    OutcomeId,
    "outcome"
);
