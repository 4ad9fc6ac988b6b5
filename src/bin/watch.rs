//! Agent Graph watcher
//!
//! Subscribes to a running server and keeps a view controller in sync,
//! logging each replaced diagram.

use std::sync::Arc;

use agent_graph::client::ChannelClient;
use agent_graph::config::Config;
use agent_graph::types::GraphResult;
use agent_graph::GraphViewController;
use parking_lot::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> GraphResult<()> {
    agent_graph::init_tracing();

    let config = Config::from_env()?;
    let controller = Arc::new(RwLock::new(GraphViewController::new()));

    let (client, snapshots) = ChannelClient::connect(&config.url).await?;
    let driver = tokio::spawn(agent_graph::client::drive(Arc::clone(&controller), snapshots));

    tokio::select! {
        applied = driver => {
            info!(applied = applied.unwrap_or_default(), "Channel ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, disconnecting");
        }
    }

    client.disconnect().await;

    let view = controller.read();
    info!(
        snapshot = view.snapshot_idx().unwrap_or("-"),
        elements = view.diagram().len(),
        zoom = view.zoom_level(),
        "Final diagram"
    );
    Ok(())
}
