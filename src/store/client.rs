//! Combined document store client: REST one-shots plus websocket watches

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, instrument};

use super::auth::mint_access_token;
use super::push::StorePushClient;
use super::rest::StoreRestClient;
use crate::common::errors::Result;
use crate::common::traits::{DocumentStore, WatchHandle};
use crate::common::types::DocSnapshot;
use crate::config::types::{AppSettings, StoreConfig};

/// Production [`DocumentStore`] implementation.
///
/// One-shot reads/writes go over REST; live watches each get their own
/// push connection. When the config carries a secret and username, an
/// access token is minted once and shared by both transports.
pub struct DocumentStoreClient {
    rest: StoreRestClient,
    push: StorePushClient,
}

impl DocumentStoreClient {
    /// Build a client from configuration
    pub fn new(config: &StoreConfig, settings: &AppSettings) -> Result<Self> {
        let token = match (&config.secret, &config.username) {
            (Some(secret), Some(username)) => Some(mint_access_token(secret, username)?),
            _ => None,
        };

        let mut rest = StoreRestClient::with_timeout(
            &config.rest_url,
            Duration::from_secs(settings.request_timeout_seconds),
        )?;
        let mut push = StorePushClient::new(&config.websocket_url)
            .with_keepalive_interval(settings.keepalive_interval_seconds);

        if let Some(token) = token {
            info!("Store access token minted for {:?}", config.username);
            rest = rest.with_token(token.clone());
            push = push.with_token(token);
        }

        Ok(Self { rest, push })
    }

    /// Access the underlying REST client
    pub fn rest(&self) -> &StoreRestClient {
        &self.rest
    }
}

#[async_trait]
impl DocumentStore for DocumentStoreClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.rest.get(path).await
    }

    async fn put(&self, path: &str, value: Value) -> Result<()> {
        self.rest.put(path, &value).await
    }

    async fn update(&self, path: &str, value: Value) -> Result<()> {
        self.rest.update(path, &value).await
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.rest.remove(path).await
    }

    #[instrument(skip(self, sender))]
    async fn watch(
        &self,
        path: &str,
        sender: mpsc::Sender<DocSnapshot>,
    ) -> Result<WatchHandle> {
        self.push.listen(path, sender).await
    }

    fn store_name(&self) -> &'static str {
        "document-store"
    }
}
