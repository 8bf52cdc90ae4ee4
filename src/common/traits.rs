//! Trait definitions for remote document stores

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::errors::Result;
use super::types::DocSnapshot;

/// Handle for a live watch on one remote path.
///
/// Stopping the handle (or dropping it) tears the listener down; the
/// snapshot sender it was given receives nothing afterwards.
#[derive(Debug)]
pub struct WatchHandle {
    stop_tx: Option<oneshot::Sender<()>>,
}

impl WatchHandle {
    pub fn new(stop_tx: oneshot::Sender<()>) -> Self {
        Self {
            stop_tx: Some(stop_tx),
        }
    }

    /// Stop the watch. Idempotent; a listener that already ended is fine.
    pub fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Trait for path-addressed remote document stores.
///
/// This is the seam between the sync layer and the concrete transport;
/// the production implementation combines a REST client for one-shot
/// operations with a websocket push client for watches, and tests plug
/// in an in-memory store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the document at `path` once
    async fn get(&self, path: &str) -> Result<serde_json::Value>;

    /// Replace the document at `path`
    async fn put(&self, path: &str, value: serde_json::Value) -> Result<()>;

    /// Merge fields into the document at `path` (field-level last-writer-wins)
    async fn update(&self, path: &str, value: serde_json::Value) -> Result<()>;

    /// Delete the document at `path`
    async fn remove(&self, path: &str) -> Result<()>;

    /// Start a live watch on `path`, forwarding snapshots to `sender`
    /// in arrival order. The returned handle stops the watch.
    async fn watch(
        &self,
        path: &str,
        sender: mpsc::Sender<DocSnapshot>,
    ) -> Result<WatchHandle>;

    /// Name of the backing store implementation
    fn store_name(&self) -> &'static str;
}
