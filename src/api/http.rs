//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::rest::graph;
use super::sse::handler::sse_handler;
use super::websocket::{handler::ws_handler, state::AppState};
use crate::types::GraphResult;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Channel endpoints
        .route("/api/graph", get(graph::warm_up))
        .route("/api/graph/stream", get(sse_handler))
        .route("/api/channel", get(graph::channel_status))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn serve(state: Arc<AppState>) -> GraphResult<()> {
    let addr = state.config.addr;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn app() -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new(Config::default()));
        let app = create_router(Arc::clone(&state));
        (state, app)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_, app) = app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_warm_up_installs_channel_with_empty_body() {
        let (state, app) = app();
        assert!(state.channel().is_none());

        let response = app
            .oneshot(Request::builder().uri("/api/graph").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.is_empty());
        assert!(state.channel().is_some());
    }

    #[tokio::test]
    async fn test_repeated_warm_up_keeps_same_channel() {
        let (state, app) = app();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(Request::builder().uri("/api/graph").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let (channel, installed_now) = state.install_channel();
        assert!(!installed_now);
        assert_eq!(channel.active_feeds(), 0);
    }

    #[tokio::test]
    async fn test_channel_status_reports_install() {
        let (state, app) = app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/channel").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["installed"], false);

        state.install_channel();

        let response = app
            .oneshot(Request::builder().uri("/api/channel").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["installed"], true);
        assert_eq!(json["interval_ms"], 5000);
    }
}
