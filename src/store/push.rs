//! WebSocket push client: one live listener per watched path

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::interval;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, instrument, warn};

use super::messages::{StreamEnvelope, StreamEvent, WsListenMessage};
use crate::common::errors::{Result, SyncError};
use crate::common::traits::WatchHandle;
use crate::common::types::DocSnapshot;

/// Push client for the document store's live stream endpoint.
///
/// Each [`listen`](StorePushClient::listen) call opens its own websocket
/// connection scoped to one path; the at-most-one-listener-per-path rule
/// is enforced above this layer by the sync manager.
#[derive(Debug, Clone)]
pub struct StorePushClient {
    /// WebSocket URL of the stream endpoint
    ws_url: String,
    /// Optional access token included in the listen frame
    token: Option<String>,
    /// Keep-alive ping interval in seconds
    keepalive_interval: u64,
}

impl StorePushClient {
    pub fn new(ws_url: &str) -> Self {
        Self {
            ws_url: ws_url.trim_end_matches('/').to_string(),
            token: None,
            keepalive_interval: 30,
        }
    }

    /// Attach an access token for stores with auth enabled
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// Set the keep-alive ping interval
    pub fn with_keepalive_interval(mut self, seconds: u64) -> Self {
        self.keepalive_interval = seconds;
        self
    }

    /// Open a live watch on `path`.
    ///
    /// Connects, sends the `listen` frame, and spawns a read loop that
    /// forwards each full document snapshot to `sender` in arrival order.
    /// `patch` events are merged into the last known document so consumers
    /// always see complete snapshots. Stopping the returned handle sends
    /// an `unlisten` frame and closes the connection.
    #[instrument(skip(self, sender))]
    pub async fn listen(
        &self,
        path: &str,
        sender: mpsc::Sender<DocSnapshot>,
    ) -> Result<WatchHandle> {
        info!("Connecting to store stream: {}", self.ws_url);

        let (ws_stream, _response) = connect_async(&self.ws_url)
            .await
            .map_err(|e| SyncError::WebSocketConnection(e.to_string()))?;

        let (mut write, mut read) = ws_stream.split();

        let listen_msg = WsListenMessage::listen(path, self.token.clone());
        let frame = serde_json::to_string(&listen_msg)?;
        debug!("Sending listen frame: {}", frame);
        write.send(Message::Text(frame)).await?;

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let watched_path = path.to_string();
        let keepalive = self.keepalive_interval;

        tokio::spawn(async move {
            // Last full document seen for this path; patches merge into it
            let mut current = Value::Null;
            let mut ping_interval = interval(Duration::from_secs(keepalive));

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        // Expected cancellation: unlisten, close, no error
                        if let Ok(text) =
                            serde_json::to_string(&WsListenMessage::unlisten(&watched_path))
                        {
                            let _ = write.send(Message::Text(text)).await;
                        }
                        let _ = write.send(Message::Close(None)).await;
                        debug!(path = %watched_path, "listener stopped");
                        break;
                    }
                    _ = ping_interval.tick() => {
                        if write.send(Message::Ping(Vec::new())).await.is_err() {
                            warn!(path = %watched_path, "keep-alive ping failed, closing listener");
                            break;
                        }
                    }
                    msg = read.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let envelope: StreamEnvelope = match serde_json::from_str(&text) {
                                    Ok(envelope) => envelope,
                                    Err(e) => {
                                        warn!("Failed to parse stream frame: {} - {}", e, text);
                                        continue;
                                    }
                                };
                                match envelope.into_event() {
                                    StreamEvent::Put { data, .. } => {
                                        current = data;
                                    }
                                    StreamEvent::Patch { data, .. } => {
                                        merge_fields(&mut current, &data);
                                    }
                                    StreamEvent::KeepAlive => {
                                        debug!(path = %watched_path, "keep-alive");
                                        continue;
                                    }
                                    StreamEvent::Cancel { reason } => {
                                        // Server-initiated close is the unexpected case
                                        error!(
                                            path = %watched_path,
                                            "{}",
                                            SyncError::SubscriptionClosed(reason)
                                        );
                                        break;
                                    }
                                    StreamEvent::Unknown { event } => {
                                        debug!(path = %watched_path, event, "ignoring unknown event");
                                        continue;
                                    }
                                }

                                let snapshot = DocSnapshot {
                                    path: watched_path.clone(),
                                    value: current.clone(),
                                };
                                if sender.send(snapshot).await.is_err() {
                                    debug!(path = %watched_path, "snapshot receiver dropped, closing listener");
                                    break;
                                }
                            }
                            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                                // tungstenite answers pings for us
                            }
                            Some(Ok(Message::Close(frame))) => {
                                info!(path = %watched_path, "stream closed: {:?}", frame);
                                break;
                            }
                            Some(Err(e)) => {
                                error!(path = %watched_path, "stream error: {}", e);
                                break;
                            }
                            None => {
                                info!(path = %watched_path, "stream ended");
                                break;
                            }
                            _ => {}
                        }
                    }
                }
            }
        });

        Ok(WatchHandle::new(stop_tx))
    }
}

/// Shallow field merge for `patch` events
fn merge_fields(current: &mut Value, patch: &Value) {
    match (current, patch) {
        (Value::Object(fields), Value::Object(updates)) => {
            for (key, value) in updates {
                fields.insert(key.clone(), value.clone());
            }
        }
        (slot, other) => {
            if !other.is_null() {
                *slot = other.clone();
            }
        }
    }
}
