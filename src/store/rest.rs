//! REST client for one-shot document store operations

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::common::errors::{Result, SyncError};

/// REST client for path-addressed document reads and writes.
///
/// Documents live at `{base_url}/{path}.json`; reads are `GET`, full
/// replacements `PUT`, field merges `PATCH`, removals `DELETE`.
#[derive(Debug, Clone)]
pub struct StoreRestClient {
    /// HTTP client
    client: Client,
    /// Base URL of the document store
    base_url: String,
    /// Optional access token, sent as the `auth` query parameter
    token: Option<String>,
}

impl StoreRestClient {
    /// Create a new REST client with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with a custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach an access token for stores with auth enabled
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    fn document_url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}.json",
            self.base_url,
            path.trim_matches('/')
        ))
        .map_err(|e| SyncError::Configuration(format!("invalid document URL: {}", e)))?;

        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    /// Read the document at `path` once. An absent document is `null`.
    #[instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Value> {
        let url = self.document_url(path)?;
        debug!("Fetching document from: {}", url.path());

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::InvalidResponse(format!(
                "Store returned status {} for {}",
                response.status(),
                path
            )));
        }

        Ok(response.json().await?)
    }

    /// Replace the document at `path`
    #[instrument(skip(self, value))]
    pub async fn put(&self, path: &str, value: &Value) -> Result<()> {
        let url = self.document_url(path)?;
        let response = self.client.put(url).json(value).send().await?;
        Self::check_write(path, response).await
    }

    /// Merge fields into the document at `path`
    #[instrument(skip(self, value))]
    pub async fn update(&self, path: &str, value: &Value) -> Result<()> {
        let url = self.document_url(path)?;
        let response = self.client.patch(url).json(value).send().await?;
        Self::check_write(path, response).await
    }

    /// Delete the document at `path`
    #[instrument(skip(self))]
    pub async fn remove(&self, path: &str) -> Result<()> {
        let url = self.document_url(path)?;
        let response = self.client.delete(url).send().await?;
        Self::check_write(path, response).await
    }

    async fn check_write(path: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::RemoteWrite {
            path: path.to_string(),
            reason: format!("status {}: {}", status, body),
        })
    }
}
