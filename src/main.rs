//! Agent Graph server - Binary Entry Point
//!
//! Serves the snapshot channel over HTTP/WebSocket.

use std::sync::Arc;

use agent_graph::api;
use agent_graph::config::Config;
use agent_graph::types::GraphResult;
use agent_graph::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> GraphResult<()> {
    agent_graph::init_tracing();

    let config = Config::from_env()?;
    info!(
        version = agent_graph::VERSION,
        interval_ms = config.interval.as_millis() as u64,
        "Agent graph server starting"
    );

    let state = Arc::new(AppState::new(config));
    api::serve(state).await
}
