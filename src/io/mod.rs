//! Persistence: the `.efg` text writer and binary snapshots.

mod snapshot;
mod writer;
