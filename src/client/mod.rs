//! Push-channel client
//!
//! Connects to the `/ws` endpoint and turns `graphUpdate` messages into
//! snapshots for a [`GraphViewController`]. Dropping the client (or calling
//! [`ChannelClient::disconnect`]) tears the subscription down.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::api::websocket::events::{ChannelMessage, ClientMessage};
use crate::types::{GraphResult, GraphSnapshot};
use crate::view::GraphViewController;

const SNAPSHOT_BUFFER: usize = 16;
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Live subscription to the snapshot channel
pub struct ChannelClient {
    handle: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl ChannelClient {
    /// Connect and start receiving snapshots
    pub async fn connect(url: &str) -> GraphResult<(Self, mpsc::Receiver<GraphSnapshot>)> {
        let (ws, _) = connect_async(url).await?;
        info!(%url, "Connected to channel");

        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(Self::run(ws, tx, shutdown_rx));
        Ok((
            Self {
                handle: Some(handle),
                shutdown: Some(shutdown_tx),
            },
            rx,
        ))
    }

    /// Stop the subscription, sending a close frame to the server
    ///
    /// Falls back to aborting the connection task if the close handshake
    /// does not finish within a short timeout.
    pub async fn disconnect(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(mut handle) = self.handle.take() {
            if timeout(CLOSE_TIMEOUT, &mut handle).await.is_err() {
                warn!("Channel did not close in time, aborting");
                handle.abort();
            }
        }
    }

    /// Whether the connection task has ended
    pub fn is_closed(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    async fn run<S>(ws: S, tx: mpsc::Sender<GraphSnapshot>, mut shutdown: oneshot::Receiver<()>)
    where
        S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
            + Unpin,
    {
        let (mut sink, mut stream) = ws.split();
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Disconnect requested");
                    break;
                }

                incoming = stream.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => match decode_message(&text) {
                            Some(ChannelMessage::GraphUpdate { payload, sequence_id, .. }) => {
                                debug!(sequence_id, "Snapshot received");
                                if tx.send(payload).await.is_err() {
                                    break; // Nobody is listening anymore
                                }
                            }
                            Some(ChannelMessage::Error { code, message }) => {
                                warn!(%code, %message, "Channel reported an error");
                            }
                            Some(_) => {}
                            None => debug!(%text, "Ignoring unrecognized message"),
                        },
                        Some(Ok(Message::Ping(data))) => {
                            if sink.send(Message::Pong(data)).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!(error = %e, "Channel connection failed");
                            break;
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    match serde_json::to_string(&ClientMessage::Ping) {
                        Ok(json) => {
                            if sink.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "Failed to encode ping"),
                    }
                }
            }
        }

        // Sends the close frame
        let _ = sink.close().await;
        info!("Channel closed");
    }
}

impl Drop for ChannelClient {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

/// Parse a server text frame
pub fn decode_message(text: &str) -> Option<ChannelMessage> {
    serde_json::from_str(text).ok()
}

/// Apply snapshots to a shared controller until the channel ends
///
/// Returns the number of snapshots applied.
pub async fn drive(
    controller: Arc<RwLock<GraphViewController>>,
    mut snapshots: mpsc::Receiver<GraphSnapshot>,
) -> usize {
    let mut applied = 0;
    while let Some(snapshot) = snapshots.recv().await {
        controller.write().apply_snapshot(&snapshot);
        applied += 1;
    }
    applied
}
