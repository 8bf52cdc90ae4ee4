//! Wire frames for the document store push protocol

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client-to-server frame actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenAction {
    Listen,
    Unlisten,
}

impl std::fmt::Display for ListenAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenAction::Listen => write!(f, "listen"),
            ListenAction::Unlisten => write!(f, "unlisten"),
        }
    }
}

/// Frame sent to open or close a live watch on one path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsListenMessage {
    pub action: ListenAction,
    pub path: String,
    /// Access token, required by stores with auth enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

impl WsListenMessage {
    pub fn listen(path: &str, auth: Option<String>) -> Self {
        Self {
            action: ListenAction::Listen,
            path: path.to_string(),
            auth,
        }
    }

    pub fn unlisten(path: &str) -> Self {
        Self {
            action: ListenAction::Unlisten,
            path: path.to_string(),
            auth: None,
        }
    }
}

/// Raw server-to-client frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEnvelope {
    pub event: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Decoded server push event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Full document replacement at `path`
    Put { path: String, data: Value },
    /// Field-level merge into the document at `path`
    Patch { path: String, data: Value },
    /// Liveness signal, no payload
    KeepAlive,
    /// Server revoked the listen (auth expiry, path removal)
    Cancel { reason: String },
    /// Unknown event kind, kept for debugging
    Unknown { event: String },
}

impl StreamEnvelope {
    /// Classify the raw frame into a [`StreamEvent`]
    pub fn into_event(self) -> StreamEvent {
        match self.event.as_str() {
            "put" => StreamEvent::Put {
                path: self.path.unwrap_or_default(),
                data: self.data.unwrap_or(Value::Null),
            },
            "patch" => StreamEvent::Patch {
                path: self.path.unwrap_or_default(),
                data: self.data.unwrap_or(Value::Null),
            },
            "keep-alive" => StreamEvent::KeepAlive,
            "cancel" | "auth_revoked" => StreamEvent::Cancel {
                reason: self
                    .data
                    .and_then(|d| d.as_str().map(str::to_string))
                    .unwrap_or_else(|| self.event),
            },
            _ => StreamEvent::Unknown { event: self.event },
        }
    }
}
