//! Local match state machines.
//!
//! Everything here is synchronous and pure: the sync layer decodes these
//! from remote snapshots, the session mutates them optimistically in
//! response to operator commands, and writes go out separately.

pub mod clock;
pub mod scoreboard;
pub mod shootout;

pub use clock::{MatchClock, Period};
pub use scoreboard::{CounterKind, ScoreBoard, SideScore};
pub use shootout::{evaluate, KickOutcome, PenaltyShootout, ShootoutVerdict};
