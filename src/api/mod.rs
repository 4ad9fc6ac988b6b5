//! API module for HTTP, WebSocket and SSE endpoints
//!
//! This module serves the push channel that feeds live graph snapshots to
//! dashboard clients.

pub mod http;
pub mod rest;
pub mod sse;
pub mod websocket;

pub use http::{create_router, serve};
