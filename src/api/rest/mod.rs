//! REST API module for HTTP endpoints
//!
//! - `GET /api/graph` - Install the push channel (warm-up)
//! - `GET /api/channel` - Channel status

pub mod graph;
