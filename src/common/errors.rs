//! Error types for the application

use thiserror::Error;

/// Result type alias using our SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// WebSocket connection errors
    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    /// WebSocket send/receive errors
    #[error("WebSocket communication error: {0}")]
    WebSocketCommunication(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Access token errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A state-machine command was issued from an incompatible state.
    /// Recoverable: local state is left unchanged.
    #[error("illegal transition: cannot {command} while {state}")]
    IllegalTransition { state: String, command: String },

    /// A one-shot remote write did not complete successfully
    #[error("remote write failed for {path}: {reason}")]
    RemoteWrite { path: String, reason: String },

    /// The remote stream was closed by the server (not by a local cancel)
    #[error("subscription closed by server: {0}")]
    SubscriptionClosed(String),

    /// Invalid store response
    #[error("Invalid store response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Channel send errors
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SyncError {
    /// Shorthand for illegal state-machine transitions
    pub fn illegal(state: impl Into<String>, command: impl Into<String>) -> Self {
        SyncError::IllegalTransition {
            state: state.into(),
            command: command.into(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for SyncError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        SyncError::WebSocketCommunication(err.to_string())
    }
}
