//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use super::events::{ChannelMessage, ClientMessage};
use super::state::AppState;

/// WebSocket upgrade handler
///
/// The first connection installs the channel if the warm-up endpoint has not
/// been hit yet.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (channel, _) = state.install_channel();
    info!("New client connected");

    let (mut sink, mut stream) = socket.split();

    // Send welcome message with current sequence ID
    let welcome = ChannelMessage::Connected {
        current_sequence_id: channel.current_sequence_id(),
    };
    if send_json(&mut sink, &welcome).await.is_err() {
        return; // Client disconnected immediately
    }

    // Dropping `_feed` at the end of this function stops the timer
    let (_feed, mut updates) = channel.open_feed();

    loop {
        tokio::select! {
            // Push snapshots to client
            update = updates.recv() => {
                match update {
                    Some(msg) => {
                        if send_json(&mut sink, &msg).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    None => break, // Feed stopped
                }
            }

            // Handle client messages
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut sink).await {
                            break; // Client requested close or error
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    None => break, // Client disconnected
                }
            }
        }
    }

    info!("Client disconnected");
}

type WsSink = futures::stream::SplitSink<WebSocket, Message>;

async fn send_json(sink: &mut WsSink, msg: &ChannelMessage) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(json) => sink.send(Message::Text(json)).await,
        Err(e) => {
            warn!(error = %e, "Failed to serialize channel message");
            Ok(())
        }
    }
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, sink: &mut WsSink) -> bool {
    match msg {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ping) => send_json(sink, &ChannelMessage::Pong).await.is_ok(),
                Err(_) => {
                    debug!(%text, "Ignoring unrecognized client message");
                    true
                }
            }
        }
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(data) => sink.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true, // Ignore pong responses
        Message::Close(_) => false, // Client requested close
    }
}
