//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AppConfig, AppSettings, StoreConfig};
use crate::common::errors::{Result, SyncError};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    // Add default config file if it exists
    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // Add environment variables with APP_ prefix
    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| SyncError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| SyncError::Configuration(e.to_string()))
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let defaults = StoreConfig::default();
    let store = StoreConfig {
        rest_url: std::env::var("STORE_REST_URL").unwrap_or(defaults.rest_url),
        websocket_url: std::env::var("STORE_WS_URL").unwrap_or(defaults.websocket_url),
        root: std::env::var("STORE_ROOT").unwrap_or(defaults.root),
        secret: std::env::var("STORE_SECRET").ok(),
        username: std::env::var("STORE_USERNAME").ok(),
    };

    Ok(AppConfig {
        store,
        settings: AppSettings::default(),
    })
}
