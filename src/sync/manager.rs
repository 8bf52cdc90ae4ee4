//! Subscription manager: at most one live stream per logical path.
//!
//! Re-observing a path tears the previous stream down before opening the
//! new one, cancellation is idempotent and discards queued snapshots, and
//! shutting the manager down (or dropping it) cancels everything it owns.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::decoders;
use super::paths::DocPath;
use crate::common::channels;
use crate::common::errors::Result;
use crate::common::traits::{DocumentStore, WatchHandle};
use crate::common::types::DecodedEntity;

/// Receiver for a fire-and-forget write's eventual outcome. The caller
/// may await it or drop it; no retry happens either way.
pub type WriteAck = oneshot::Receiver<Result<()>>;

/// One owner's live observation of a logical path.
///
/// The stream is infinite from the consumer's point of view: `recv`
/// suspends until the next remote snapshot. It ends only when the
/// subscription is cancelled or the remote stream closes.
pub struct Subscription {
    path: String,
    rx: mpsc::Receiver<DecodedEntity>,
    live: Arc<AtomicBool>,
}

impl Subscription {
    /// Await the next decoded snapshot. Returns `None` once cancelled,
    /// including for snapshots that were already queued at cancel time.
    pub async fn recv(&mut self) -> Option<DecodedEntity> {
        if !self.live.load(Ordering::SeqCst) {
            self.rx.close();
            return None;
        }
        match self.rx.recv().await {
            Some(entity) if self.live.load(Ordering::SeqCst) => Some(entity),
            _ => None,
        }
    }

    /// The rendered store path this subscription observes
    pub fn path(&self) -> &str {
        &self.path
    }
}

struct ActiveWatch {
    live: Arc<AtomicBool>,
    watch: WatchHandle,
    forward: JoinHandle<()>,
}

impl ActiveWatch {
    fn cancel(self) {
        self.live.store(false, Ordering::SeqCst);
        self.watch.stop();
        self.forward.abort();
    }
}

/// Owns every live subscription for one consumer scope
pub struct SyncManager {
    store: Arc<dyn DocumentStore>,
    root: String,
    channel_size: usize,
    watches: HashMap<String, ActiveWatch>,
}

impl SyncManager {
    pub fn new(store: Arc<dyn DocumentStore>, root: &str) -> Self {
        Self {
            store,
            root: root.to_string(),
            channel_size: channels::DEFAULT_CHANNEL_SIZE,
            watches: HashMap::new(),
        }
    }

    /// Set the snapshot/entity channel buffer size
    pub fn with_channel_size(mut self, size: usize) -> Self {
        self.channel_size = size;
        self
    }

    /// Open a live observation of `path`.
    ///
    /// If this manager already observes the path, the previous stream is
    /// cancelled first; streams replace, they never stack.
    #[instrument(skip(self))]
    pub async fn observe(&mut self, path: &DocPath) -> Result<Subscription> {
        let key = path.render(&self.root);
        if self.watches.contains_key(&key) {
            debug!(path = %key, "replacing existing subscription");
            self.cancel_key(&key);
        }

        let (raw_tx, mut raw_rx) = channels::create_snapshot_channel(self.channel_size);
        let watch = self.store.watch(&key, raw_tx).await?;

        let live = Arc::new(AtomicBool::new(true));
        let (entity_tx, entity_rx) = channels::create_entity_channel(self.channel_size);

        let decode_path = path.clone();
        let forward_live = live.clone();
        let forward = tokio::spawn(async move {
            while let Some(snapshot) = raw_rx.recv().await {
                // A snapshot arriving after cancel is discarded, not delivered
                if !forward_live.load(Ordering::SeqCst) {
                    break;
                }
                let entity = decoders::decode_entity(&decode_path, &snapshot.value);
                if entity_tx.send(entity).await.is_err() {
                    break;
                }
            }
        });

        self.watches.insert(
            key.clone(),
            ActiveWatch {
                live: live.clone(),
                watch,
                forward,
            },
        );

        Ok(Subscription {
            path: key,
            rx: entity_rx,
            live,
        })
    }

    /// Cancel the live observation of `path`, if any. Idempotent.
    pub fn cancel(&mut self, path: &DocPath) {
        let key = path.render(&self.root);
        self.cancel_key(&key);
    }

    fn cancel_key(&mut self, key: &str) {
        if let Some(active) = self.watches.remove(key) {
            active.cancel();
            debug!(path = %key, "subscription cancelled");
        }
    }

    /// Whether this manager currently observes `path`
    pub fn is_observing(&self, path: &DocPath) -> bool {
        self.watches.contains_key(&path.render(&self.root))
    }

    /// Number of live subscriptions owned by this manager
    pub fn active_count(&self) -> usize {
        self.watches.len()
    }

    /// Fire-and-forget field merge into the document at `path`.
    ///
    /// The outcome is surfaced through the returned ack; there is no
    /// automatic retry, the caller decides whether to prompt a manual one.
    pub fn write_once(&self, path: &DocPath, value: Value) -> WriteAck {
        let key = path.render(&self.root);
        let store = self.store.clone();
        let (ack_tx, ack_rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = store.update(&key, value).await;
            if let Err(e) = &outcome {
                warn!(path = %key, "remote write failed: {}", e);
            }
            let _ = ack_tx.send(outcome);
        });
        ack_rx
    }

    /// Fire-and-forget removal of the document at `path`
    pub fn remove_once(&self, path: &DocPath) -> WriteAck {
        let key = path.render(&self.root);
        let store = self.store.clone();
        let (ack_tx, ack_rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = store.remove(&key).await;
            if let Err(e) = &outcome {
                warn!(path = %key, "remote removal failed: {}", e);
            }
            let _ = ack_tx.send(outcome);
        });
        ack_rx
    }

    /// One-shot read of `path`, decoded through the coercion layer
    pub async fn read_once(&self, path: &DocPath) -> Result<DecodedEntity> {
        let key = path.render(&self.root);
        let value = self.store.get(&key).await?;
        Ok(decoders::decode_entity(path, &value))
    }

    /// Cancel every subscription this manager owns
    pub fn shutdown(&mut self) {
        let keys: Vec<String> = self.watches.keys().cloned().collect();
        for key in keys {
            self.cancel_key(&key);
        }
    }
}

impl Drop for SyncManager {
    fn drop(&mut self) {
        for (_, active) in self.watches.drain() {
            active.cancel();
        }
    }
}
