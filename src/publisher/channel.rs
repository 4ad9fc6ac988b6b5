//! Push channel shared by every connection
//!
//! The channel is installed once per server process (see
//! [`AppState::install_channel`](crate::api::websocket::state::AppState::install_channel))
//! and hands out one [`SnapshotFeed`] per connection.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use super::feed::SnapshotFeed;
use super::source::SnapshotSource;
use crate::api::websocket::events::ChannelMessage;

/// Shortest period a feed timer accepts
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Installed push channel
pub struct SnapshotChannel {
    source: Arc<dyn SnapshotSource>,
    interval: Duration,
    feed_capacity: usize,
    installed_at: DateTime<Utc>,
    sequence_counter: AtomicU64,
    active_feeds: AtomicUsize,
    snapshots_sent: AtomicU64,
}

/// Point-in-time channel counters
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChannelStats {
    pub installed: bool,
    pub active_feeds: usize,
    pub snapshots_sent: u64,
    pub interval_ms: u64,
    pub sequence_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<String>,
}

impl SnapshotChannel {
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn new(source: Arc<dyn SnapshotSource>, interval: Duration, feed_capacity: usize) -> Self {
        Self {
            source,
            interval: interval.max(MIN_INTERVAL),
            feed_capacity: feed_capacity.max(1),
            installed_at: Utc::now(),
            sequence_counter: AtomicU64::new(0),
            active_feeds: AtomicUsize::new(0),
            snapshots_sent: AtomicU64::new(0),
        }
    }

    /// Period between two pushes on a feed
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Build the next `graphUpdate` message, consuming one sequence id
    pub fn next_message(&self) -> ChannelMessage {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        ChannelMessage::graph_update(self.source.next_snapshot(), seq)
    }

    /// Start a periodic feed for one connection
    ///
    /// The returned guard owns the timer task; dropping it stops the feed.
    pub fn open_feed(self: &Arc<Self>) -> (SnapshotFeed, mpsc::Receiver<ChannelMessage>) {
        SnapshotFeed::spawn(Arc::clone(self), self.feed_capacity)
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    pub fn active_feeds(&self) -> usize {
        self.active_feeds.load(Ordering::SeqCst)
    }

    pub fn snapshots_sent(&self) -> u64 {
        self.snapshots_sent.load(Ordering::SeqCst)
    }

    pub(crate) fn feed_opened(&self) {
        self.active_feeds.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn feed_closed(&self) {
        self.active_feeds.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn record_sent(&self) {
        self.snapshots_sent.fetch_add(1, Ordering::SeqCst);
    }

    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            installed: true,
            active_feeds: self.active_feeds(),
            snapshots_sent: self.snapshots_sent(),
            interval_ms: self.interval.as_millis() as u64,
            sequence_id: self.current_sequence_id(),
            installed_at: Some(self.installed_at.to_rfc3339()),
        }
    }
}

impl ChannelStats {
    /// Stats reported before the channel has been installed
    pub fn not_installed(interval: Duration) -> Self {
        Self {
            installed: false,
            active_feeds: 0,
            snapshots_sent: 0,
            interval_ms: interval.as_millis() as u64,
            sequence_id: 0,
            installed_at: None,
        }
    }
}
