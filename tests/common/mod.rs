//! Common test utilities and fixtures

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc, oneshot};

use livematch_sync::common::errors::{Result, SyncError};
use livematch_sync::common::traits::{DocumentStore, WatchHandle};
use livematch_sync::common::types::DocSnapshot;

/// In-memory document store used as the sync-layer test double.
///
/// Behaves like the production store from the manager's point of view:
/// watches deliver the current document immediately and every committed
/// write afterwards, in order, per path.
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
    watchers: Mutex<HashMap<String, broadcast::Sender<Value>>>,
    /// When set, every write/removal fails with a RemoteWrite error
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            documents: Mutex::new(HashMap::new()),
            watchers: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        })
    }

    /// Seed a document without going through the write path
    pub fn seed(&self, path: &str, value: Value) {
        self.documents
            .lock()
            .unwrap()
            .insert(path.to_string(), value);
    }

    /// Read a document directly, bypassing the async API
    pub fn peek(&self, path: &str) -> Value {
        self.documents
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Commit a value and push it to any watcher of the path
    pub fn commit(&self, path: &str, value: Value) {
        self.seed(path, value.clone());
        if let Some(tx) = self.watchers.lock().unwrap().get(path) {
            let _ = tx.send(value);
        }
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SyncError::RemoteWrite {
                path: path.to_string(),
                reason: "memory store configured to fail writes".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Value> {
        Ok(self.peek(path))
    }

    async fn put(&self, path: &str, value: Value) -> Result<()> {
        self.check_writable(path)?;
        self.commit(path, value);
        Ok(())
    }

    async fn update(&self, path: &str, value: Value) -> Result<()> {
        self.check_writable(path)?;
        let merged = {
            let documents = self.documents.lock().unwrap();
            let mut current = documents.get(path).cloned().unwrap_or(Value::Null);
            match (&mut current, &value) {
                (Value::Object(fields), Value::Object(updates)) => {
                    for (key, update) in updates {
                        fields.insert(key.clone(), update.clone());
                    }
                    current
                }
                _ => value,
            }
        };
        self.commit(path, merged);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.check_writable(path)?;
        self.documents.lock().unwrap().remove(path);
        if let Some(tx) = self.watchers.lock().unwrap().get(path) {
            let _ = tx.send(Value::Null);
        }
        Ok(())
    }

    async fn watch(
        &self,
        path: &str,
        sender: mpsc::Sender<DocSnapshot>,
    ) -> Result<WatchHandle> {
        let mut rx = self
            .watchers
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_insert_with(|| broadcast::channel(32).0)
            .subscribe();
        let initial = self.peek(path);

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let watched_path = path.to_string();
        tokio::spawn(async move {
            let initial_snapshot = DocSnapshot {
                path: watched_path.clone(),
                value: initial,
            };
            if sender.send(initial_snapshot).await.is_err() {
                return;
            }
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    msg = rx.recv() => match msg {
                        Ok(value) => {
                            let snapshot = DocSnapshot {
                                path: watched_path.clone(),
                                value,
                            };
                            if sender.send(snapshot).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        Ok(WatchHandle::new(stop_tx))
    }

    fn store_name(&self) -> &'static str {
        "memory-store"
    }
}

/// Sample remote payloads exercising the weakly-typed wire format
pub mod payloads {
    /// A match document where half the fields arrive as the wrong type
    pub const WEAKLY_TYPED_MATCH: &str = r#"{
        "tournamentId": "T1",
        "matchId": "M7",
        "team1Id": "TeamA",
        "team1Name": "Rovers",
        "team2Id": "TeamB",
        "team2Name": "United",
        "date": "2025-01-10",
        "time": "18:30",
        "venue": "Pitch 2",
        "stage": "Semi",
        "period": "1T",
        "elapsedTime": "45M30",
        "periodLengthMinutes": "45",
        "isClockRunning": "1",
        "goals1": "2",
        "goals2": 1.0,
        "yellowCards1": 1,
        "yellowCards2": "0",
        "redCards1": 0,
        "redCards2": 0,
        "corners1": "4",
        "corners2": 3,
        "penaltiesActive": false,
        "penaltyInitiator": "1",
        "penaltyTurn": 1,
        "penaltyRound": 1,
        "penaltyHistory1": "",
        "penaltyHistory2": "",
        "penaltyScore1": 0,
        "penaltyScore2": 0
    }"#;

    /// Operator permissions pointing at the sample match
    pub const PERMISSIONS: &str = r#"{
        "assignedTournamentId": "T1",
        "assignedMatchId": "M7"
    }"#;
}
