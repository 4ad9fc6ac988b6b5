//! Snapshot publisher
//!
//! Fabricates graph snapshots and pushes them to connected clients on a
//! fixed interval.
//!
//! ## Pieces
//! - [`SnapshotSource`]: produces one snapshot per tick (mock by default)
//! - [`SnapshotChannel`]: the push channel, installed once per process
//! - [`SnapshotFeed`]: one connection's timer, stopped when dropped

pub mod channel;
pub mod feed;
pub mod source;

pub use channel::{ChannelStats, SnapshotChannel, MIN_INTERVAL};
pub use feed::SnapshotFeed;
pub use source::{MockSnapshotSource, SnapshotSource};
