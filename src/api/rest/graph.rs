//! Graph channel endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::websocket::state::AppState;

/// GET /api/graph - Warm up the push channel
///
/// Installs the channel on first use; later calls only log. Always answers
/// with an empty 200.
pub async fn warm_up(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.install_channel();
    StatusCode::OK
}

/// GET /api/channel - Channel status and counters
pub async fn channel_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.channel_stats())
}
