//! Error types for the connection runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the connection runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend endpoint could not be used as given.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Failed to establish the connection to the agent backend.
    #[error("Failed to connect to agent backend: {0}")]
    ConnectionFailed(String),

    /// Transport-level error (WebSocket I/O).
    #[error("Transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel closed unexpectedly (connection task already gone).
    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}
