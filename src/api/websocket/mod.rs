//! WebSocket module for live graph updates
//!
//! Provides the WebSocket endpoint at `/ws`. Every connection gets its own
//! snapshot feed which is released when the socket closes.
//!
//! ## Messages
//! - `connected` welcome with the current sequence ID
//! - `graphUpdate` carrying a full snapshot every interval
//! - `pong` in reply to a client `ping`

pub mod events;
pub mod handler;
pub mod state;

// Re-export commonly used items
pub use events::{ChannelMessage, ClientMessage, GRAPH_UPDATE};
pub use state::AppState;
