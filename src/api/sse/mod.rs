//! SSE (Server-Sent Events) transport for graph snapshots
//!
//! Alternative to the WebSocket channel for clients that only need to
//! listen. Each event carries the same JSON as a WebSocket `graphUpdate`.
//!
//! ## Endpoints
//! - `GET /api/graph/stream` - SSE stream of snapshots

pub mod handler;

use serde::Serialize;

/// SSE control events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseEvent {
    /// Welcome message on connect
    Welcome { sequence_id: u64 },
}
