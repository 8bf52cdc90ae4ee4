//! Real-time synchronization layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    REMOTE (push + REST)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DocumentStore::watch ──► raw DocSnapshot channel           │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SyncManager (per scope)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  one live stream per path · decode via coercion layer       │
//! │  cancel = flag + abort, queued snapshots discarded          │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LiveMatchSession                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  owns MatchClock / ScoreBoard / PenaltyShootout             │
//! │  optimistic commands · fire-and-forget writes with acks     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod decoders;
pub mod manager;
pub mod paths;
pub mod session;

pub use manager::{Subscription, SyncManager, WriteAck};
pub use paths::DocPath;
pub use session::{
    ClockCommand, LiveMatchSession, PenaltyCommand, RevocationOutcome,
};
