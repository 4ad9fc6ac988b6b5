//! Data types for the agent graph dashboard
//!
//! This module contains the snapshot wire types, the derived diagram
//! elements, and the crate error type.

mod element;
mod snapshot;

pub use element::{DiagramElement, EdgeData, ElementData, NodeData, NodeType, Position};
pub use snapshot::{Agent, GraphSnapshot, Tool};

use thiserror::Error;

/// Errors raised by the publisher, the channel client and configuration
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Config {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown element type: {0}")]
    UnknownElementType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Result type for crate operations
pub type GraphResult<T> = Result<T, GraphError>;
