//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

use super::types::{DecodedEntity, DocSnapshot};

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Create a new raw snapshot channel
pub fn create_snapshot_channel(
    size: usize,
) -> (mpsc::Sender<DocSnapshot>, mpsc::Receiver<DocSnapshot>) {
    mpsc::channel(size)
}

/// Create a new decoded entity channel
pub fn create_entity_channel(
    size: usize,
) -> (mpsc::Sender<DecodedEntity>, mpsc::Receiver<DecodedEntity>) {
    mpsc::channel(size)
}
