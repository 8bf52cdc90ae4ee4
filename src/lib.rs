//! livematch_sync Library
//!
//! A Rust library that keeps an in-memory representation of a live
//! football match synchronized with a remote, weakly-typed,
//! tree-structured document store.

pub mod coerce;
pub mod common;
pub mod config;
pub mod expiry;
pub mod state;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use common::errors::{Result, SyncError};
pub use common::traits::{DocumentStore, WatchHandle};
pub use common::types::{
    DecodedEntity, DocSnapshot, Group, LiveMatchState, Match, MatchDocument, MatchStatus, Side,
    Stage, Team, UserPermissions,
};
pub use config::types::AppConfig;
pub use state::{
    evaluate, CounterKind, KickOutcome, MatchClock, PenaltyShootout, Period, ScoreBoard,
    ShootoutVerdict, SideScore,
};
pub use store::{DocumentStoreClient, StorePushClient, StoreRestClient};
pub use sync::{
    ClockCommand, DocPath, LiveMatchSession, PenaltyCommand, RevocationOutcome, Subscription,
    SyncManager, WriteAck,
};
