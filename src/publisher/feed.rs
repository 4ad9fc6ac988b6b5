//! Per-connection snapshot feed

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::channel::SnapshotChannel;
use crate::api::websocket::events::ChannelMessage;

/// Guard owning one connection's periodic timer task
///
/// The task is aborted when the guard is dropped, so a feed never outlives
/// the connection that opened it.
pub struct SnapshotFeed {
    handle: JoinHandle<()>,
    channel: Arc<SnapshotChannel>,
}

impl SnapshotFeed {
    /// Spawn the timer task; the first snapshot is pushed one interval from now
    pub fn spawn(
        channel: Arc<SnapshotChannel>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<ChannelMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        channel.feed_opened();

        let handle = tokio::spawn(Self::run(Arc::clone(&channel), tx));

        (Self { handle, channel }, rx)
    }

    /// Whether the timer task has stopped
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    async fn run(channel: Arc<SnapshotChannel>, tx: mpsc::Sender<ChannelMessage>) {
        let period = channel.interval();
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            let msg = channel.next_message();
            if tx.send(msg).await.is_err() {
                // Receiver dropped
                debug!("Feed receiver closed, stopping timer");
                break;
            }
            channel.record_sent();
        }
    }
}

impl Drop for SnapshotFeed {
    fn drop(&mut self) {
        self.handle.abort();
        self.channel.feed_closed();
    }
}
