//! SSE snapshot stream handler

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use tracing::info;

use super::SseEvent;
use crate::api::websocket::events::{ChannelMessage, GRAPH_UPDATE};
use crate::api::websocket::state::AppState;

/// GET /api/graph/stream - SSE stream of graph snapshots
///
/// The feed guard lives inside the stream, so the timer stops as soon as
/// the client goes away and axum drops the response body.
pub async fn sse_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (channel, _) = state.install_channel();
    let sequence_id = channel.current_sequence_id();
    info!("New SSE client connected");

    let stream = async_stream::stream! {
        let (_feed, mut updates) = channel.open_feed();

        let welcome = SseEvent::Welcome { sequence_id };
        yield Ok::<_, Infallible>(Event::default()
            .event("welcome")
            .data(serde_json::to_string(&welcome).unwrap_or_default()));

        while let Some(msg) = updates.recv().await {
            if let ChannelMessage::GraphUpdate { .. } = msg {
                yield Ok(Event::default()
                    .event(GRAPH_UPDATE)
                    .data(serde_json::to_string(&msg).unwrap_or_default()));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default().interval(Duration::from_secs(30)))
}
