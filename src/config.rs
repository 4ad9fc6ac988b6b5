//! Environment-driven configuration

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::publisher::MIN_INTERVAL;
use crate::types::{GraphError, GraphResult};

pub const ENV_ADDR: &str = "AGENT_GRAPH_ADDR";
pub const ENV_INTERVAL_MS: &str = "AGENT_GRAPH_INTERVAL_MS";
pub const ENV_FEED_CAPACITY: &str = "AGENT_GRAPH_FEED_CAPACITY";
pub const ENV_URL: &str = "AGENT_GRAPH_URL";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_INTERVAL_MS: u64 = 5000;
const DEFAULT_FEED_CAPACITY: usize = 16;
const DEFAULT_URL: &str = "ws://127.0.0.1:3000/ws";

/// Runtime configuration for the server and the watcher
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
    /// Period between two snapshots on a feed
    pub interval: Duration,
    /// Buffered messages per feed before the feed task waits
    pub feed_capacity: usize,
    /// WebSocket URL the watcher connects to
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            feed_capacity: DEFAULT_FEED_CAPACITY,
            url: DEFAULT_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> GraphResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> GraphResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_raw = lookup(ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.parse::<SocketAddr>().map_err(|e| GraphError::Config {
            var: ENV_ADDR,
            value: addr_raw.clone(),
            reason: e.to_string(),
        })?;

        let interval_ms = match lookup(ENV_INTERVAL_MS) {
            Some(raw) => parse_positive(ENV_INTERVAL_MS, &raw)? as u64,
            None => DEFAULT_INTERVAL_MS,
        };

        let feed_capacity = match lookup(ENV_FEED_CAPACITY) {
            Some(raw) => parse_positive(ENV_FEED_CAPACITY, &raw)?,
            None => DEFAULT_FEED_CAPACITY,
        };

        let url = lookup(ENV_URL).unwrap_or_else(|| DEFAULT_URL.to_string());

        Ok(Self {
            addr,
            interval: Duration::from_millis(interval_ms),
            feed_capacity,
            url,
        })
    }

    /// Override the snapshot interval, raised to at least [`MIN_INTERVAL`]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }
}

fn parse_positive(var: &'static str, raw: &str) -> GraphResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(GraphError::Config {
            var,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(GraphError::Config {
            var,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}
