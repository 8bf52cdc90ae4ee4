//! Configuration types

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote document store configuration
    pub store: StoreConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Remote document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL for one-shot REST document operations
    #[serde(default = "default_store_rest_url")]
    pub rest_url: String,
    /// WebSocket URL for live push streams
    #[serde(default = "default_store_ws_url")]
    pub websocket_url: String,
    /// Root segment all document paths live under
    #[serde(default = "default_store_root")]
    pub root: String,
    /// Shared secret for minting access tokens
    #[serde(default)]
    pub secret: Option<String>,
    /// Operator account the session acts as
    #[serde(default)]
    pub username: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rest_url: default_store_rest_url(),
            websocket_url: default_store_ws_url(),
            root: default_store_root(),
            secret: None,
            username: None,
        }
    }
}

fn default_store_rest_url() -> String {
    "https://scorekeeper-store.example.com".to_string()
}

fn default_store_ws_url() -> String {
    "wss://scorekeeper-store.example.com/stream".to_string()
}

fn default_store_root() -> String {
    "Scorekeeper".to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Buffer size for snapshot/entity channels
    #[serde(default = "default_channel_size")]
    pub channel_size: usize,
    /// Request timeout in seconds for one-shot REST calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Keep-alive interval in seconds for push streams
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            channel_size: default_channel_size(),
            request_timeout_seconds: default_request_timeout(),
            keepalive_interval_seconds: default_keepalive_interval(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_channel_size() -> usize {
    64
}

fn default_request_timeout() -> u64 {
    30
}

fn default_keepalive_interval() -> u64 {
    30
}
