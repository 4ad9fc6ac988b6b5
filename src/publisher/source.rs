//! Snapshot sources

use chrono::{SecondsFormat, Utc};
use rand::Rng;

use crate::types::{Agent, GraphSnapshot, Tool};

const IDX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const IDX_LEN: usize = 9;

/// Produces the snapshot pushed on each feed tick
pub trait SnapshotSource: Send + Sync {
    fn next_snapshot(&self) -> GraphSnapshot;
}

/// Fabricates a fixed two-agent sample graph with a fresh id and timestamp
#[derive(Debug, Default, Clone)]
pub struct MockSnapshotSource;

impl MockSnapshotSource {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotSource for MockSnapshotSource {
    fn next_snapshot(&self) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::new(iso_timestamp(), random_idx())
            .with_agent(
                Agent::new("a1", "Agent 1")
                    .with_tool(Tool::with_io("t1", "Tool 1", "Input 1", "Output 1"))
                    .with_tool(Tool::with_io("t2", "Tool 2", "Input 2", "Output 2"))
                    .with_output("Agent 1 output"),
            )
            .with_agent(
                Agent::new("a2", "Agent 2")
                    .with_tool(Tool::with_io("t3", "Tool 3", "Input 3", "Output 3"))
                    .with_output("Agent 2 output"),
            );

        snapshot.query = "Sample query".to_string();
        snapshot.response = "Final response".to_string();
        snapshot.total_tokens = 1909;
        snapshot.is_active = true;
        snapshot
    }
}

/// Current UTC time, millisecond precision, `Z` suffix
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Random lowercase base-36 identifier
pub fn random_idx() -> String {
    let mut rng = rand::thread_rng();
    (0..IDX_LEN)
        .map(|_| IDX_ALPHABET[rng.gen_range(0..IDX_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_snapshot_shape() {
        let snapshot = MockSnapshotSource::new().next_snapshot();

        assert_eq!(snapshot.agent_count(), 2);
        assert_eq!(snapshot.agents[0].tools.len(), 2);
        assert_eq!(snapshot.agents[1].tools.len(), 1);
        assert_eq!(snapshot.query, "Sample query");
        assert_eq!(snapshot.total_tokens, 1909);
        assert!(snapshot.is_active);
        assert!(snapshot.agents.iter().all(|a| a.images.is_empty()));
    }

    #[test]
    fn test_random_idx_is_base36() {
        let idx = random_idx();
        assert_eq!(idx.len(), 9);
        assert!(idx.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let ts = iso_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_each_snapshot_gets_fresh_idx() {
        let source = MockSnapshotSource::new();
        let ids: std::collections::HashSet<String> =
            (0..20).map(|_| source.next_snapshot().idx).collect();
        assert!(ids.len() > 1);
    }
}
