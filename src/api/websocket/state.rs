//! Shared application state

use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::config::Config;
use crate::publisher::{ChannelStats, MockSnapshotSource, SnapshotChannel, SnapshotSource};

/// Shared application state for HTTP and WebSocket handlers
pub struct AppState {
    pub config: Config,

    /// Source handed to the channel when it is installed
    source: Arc<dyn SnapshotSource>,

    /// Push channel, installed at most once for the life of the process
    channel: OnceLock<Arc<SnapshotChannel>>,
}

impl AppState {
    /// Create state that publishes mock snapshots
    pub fn new(config: Config) -> Self {
        Self::with_source(config, Arc::new(MockSnapshotSource::new()))
    }

    /// Create state with a custom snapshot source
    pub fn with_source(config: Config, source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            config,
            source,
            channel: OnceLock::new(),
        }
    }

    /// Install the push channel if it is not running yet
    ///
    /// Returns the channel and whether this call installed it.
    pub fn install_channel(&self) -> (Arc<SnapshotChannel>, bool) {
        let mut installed_now = false;
        let channel = self.channel.get_or_init(|| {
            installed_now = true;
            Arc::new(SnapshotChannel::new(
                Arc::clone(&self.source),
                self.config.interval,
                self.config.feed_capacity,
            ))
        });

        if installed_now {
            info!(
                interval_ms = self.config.interval.as_millis() as u64,
                "Channel is initializing"
            );
        } else {
            info!("Channel is already running");
        }

        (Arc::clone(channel), installed_now)
    }

    /// Get the channel if it has been installed
    pub fn channel(&self) -> Option<Arc<SnapshotChannel>> {
        self.channel.get().cloned()
    }

    /// Current channel counters
    pub fn channel_stats(&self) -> ChannelStats {
        match self.channel.get() {
            Some(channel) => channel.stats(),
            None => ChannelStats::not_installed(self.config.interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_is_idempotent() {
        let state = AppState::new(Config::default());
        assert!(state.channel().is_none());

        let (first, installed) = state.install_channel();
        assert!(installed);

        let (second, installed_again) = state.install_channel();
        assert!(!installed_again);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_stats_before_install() {
        let state = AppState::new(Config::default());
        let stats = state.channel_stats();
        assert!(!stats.installed);
        assert_eq!(stats.interval_ms, 5000);
    }

    #[tokio::test]
    async fn test_feeds_share_sequence() {
        let state = AppState::new(Config::default());
        let (channel, _) = state.install_channel();

        channel.next_message();
        channel.next_message();
        assert_eq!(state.channel_stats().sequence_id, 2);
    }
}
