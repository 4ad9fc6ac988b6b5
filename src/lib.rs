//! Agent Graph
//!
//! Live visualization plumbing for an agent/tool execution graph: a server
//! that pushes synthetic graph snapshots over WebSocket (or SSE) every few
//! seconds, and a diagram view controller that turns those snapshots into
//! searchable, filterable, zoomable node-link diagrams.
//!
//! # Modules
//!
//! - `types`: Snapshot wire types, diagram elements, errors
//! - `config`: Environment-driven configuration
//! - `publisher`: Snapshot sources, the install-once channel, per-connection feeds
//! - `api`: Axum router with WebSocket, SSE and REST endpoints
//! - `view`: Diagram, layout, path-finding, and the view controller
//! - `client`: WebSocket channel client feeding a controller
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use agent_graph::{api, AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> agent_graph::GraphResult<()> {
//!     let state = Arc::new(AppState::new(Config::from_env()?));
//!     api::serve(state).await
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod publisher;
pub mod types;
pub mod view;

// Re-export commonly used items at crate root
pub use api::websocket::{AppState, ChannelMessage};
pub use client::ChannelClient;
pub use config::Config;
pub use publisher::{MockSnapshotSource, SnapshotChannel, SnapshotSource};
pub use types::{
    Agent, DiagramElement, ElementData, GraphError, GraphResult, GraphSnapshot, NodeType, Tool,
};
pub use view::{FilterType, GraphViewController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Install the `tracing` subscriber used by the binaries
///
/// Honors `RUST_LOG`; defaults to `agent_graph=info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_graph=info".into()),
        )
        .init();
}
