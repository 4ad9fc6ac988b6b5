//! Channel message types for live graph updates

use serde::{Deserialize, Serialize};

use crate::types::GraphSnapshot;

/// Event name carried by snapshot pushes
pub const GRAPH_UPDATE: &str = "graphUpdate";

/// Messages sent from the server to channel clients
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChannelMessage {
    /// Welcome message sent on connection
    #[serde(rename = "connected")]
    Connected { current_sequence_id: u64 },

    /// A complete graph snapshot
    #[serde(rename = "graphUpdate")]
    GraphUpdate {
        payload: GraphSnapshot,
        /// Channel-wide sequence ID, shared by every feed; increases per
        /// connection but is not contiguous when several clients are connected
        sequence_id: u64,
        /// Unix timestamp when the message was created
        timestamp: i64,
    },

    /// Heartbeat reply
    #[serde(rename = "pong")]
    Pong,

    /// Error notification
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl ChannelMessage {
    /// Wrap a snapshot for delivery
    pub fn graph_update(payload: GraphSnapshot, sequence_id: u64) -> Self {
        ChannelMessage::GraphUpdate {
            payload,
            sequence_id,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Consume the message, yielding its snapshot if it carries one
    pub fn into_snapshot(self) -> Option<GraphSnapshot> {
        match self {
            ChannelMessage::GraphUpdate { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Client message types
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for heartbeat
    Ping,
}
