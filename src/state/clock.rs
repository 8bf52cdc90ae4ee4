//! Match clock: period state machine and elapsed-time normalization.
//!
//! Periods only move forward (`NotStarted → FirstHalf → HalfTime →
//! SecondHalf → Finished`); a command that would move backwards or skip
//! a step is rejected as a recoverable [`SyncError::IllegalTransition`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::coerce;
use crate::common::errors::{Result, SyncError};
use crate::common::types::MatchStatus;

/// Default period length when the remote document does not carry one
const DEFAULT_PERIOD_MINUTES: u32 = 45;

/// The five match periods, serialized as `0T`..`4T`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    NotStarted,
    FirstHalf,
    HalfTime,
    SecondHalf,
    Finished,
}

impl Period {
    pub fn wire_code(&self) -> &'static str {
        match self {
            Period::NotStarted => "0T",
            Period::FirstHalf => "1T",
            Period::HalfTime => "2T",
            Period::SecondHalf => "3T",
            Period::Finished => "4T",
        }
    }

    /// Decode from the wire code, defaulting to `NotStarted`
    pub fn from_wire(code: &str) -> Period {
        match code.trim() {
            "1T" => Period::FirstHalf,
            "2T" => Period::HalfTime,
            "3T" => Period::SecondHalf,
            "4T" => Period::Finished,
            _ => Period::NotStarted,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::NotStarted
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Period::NotStarted => "not started",
            Period::FirstHalf => "first half",
            Period::HalfTime => "half-time",
            Period::SecondHalf => "second half",
            Period::Finished => "finished",
        };
        write!(f, "{}", label)
    }
}

/// Live clock state for one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClock {
    pub period: Period,
    /// Always normalized "mm:ss" text
    pub elapsed: String,
    pub period_length_minutes: u32,
    pub is_running: bool,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self {
            period: Period::NotStarted,
            elapsed: "00:00".to_string(),
            period_length_minutes: DEFAULT_PERIOD_MINUTES,
            is_running: false,
        }
    }
}

impl MatchClock {
    /// Start the next half. Legal only from `NotStarted` or `HalfTime`.
    pub fn start(&mut self) -> Result<()> {
        let next = match self.period {
            Period::NotStarted => Period::FirstHalf,
            Period::HalfTime => Period::SecondHalf,
            _ => return Err(SyncError::illegal(self.period.to_string(), "start")),
        };
        self.period = next;
        self.is_running = true;
        Ok(())
    }

    /// End the current half. Legal only from `FirstHalf` or `SecondHalf`.
    pub fn stop(&mut self) -> Result<()> {
        let next = match self.period {
            Period::FirstHalf => Period::HalfTime,
            Period::SecondHalf => Period::Finished,
            _ => return Err(SyncError::illegal(self.period.to_string(), "stop")),
        };
        self.period = next;
        self.is_running = false;
        Ok(())
    }

    /// Shift the elapsed time by a signed number of seconds, clamped at
    /// zero. Legal only while the clock is running.
    pub fn adjust(&mut self, delta_seconds: i64) -> Result<()> {
        if !self.is_running {
            return Err(SyncError::illegal(self.period.to_string(), "adjust"));
        }
        let current = i64::from(elapsed_seconds(&self.elapsed));
        let shifted = (current + delta_seconds).max(0) as u32;
        self.elapsed = render_seconds(shifted);
        Ok(())
    }

    /// Coarse status for the LiveMatch projection
    pub fn status(&self) -> MatchStatus {
        match self.period {
            Period::NotStarted => MatchStatus::NotStarted,
            Period::Finished => MatchStatus::Finished,
            Period::HalfTime => MatchStatus::Paused,
            Period::FirstHalf | Period::SecondHalf => {
                if self.is_running {
                    MatchStatus::InProgress
                } else {
                    MatchStatus::Paused
                }
            }
        }
    }

    /// Encode to the match document's wire fields
    pub fn encode(&self) -> Value {
        json!({
            "period": self.period.wire_code(),
            "elapsedTime": self.elapsed,
            "periodLengthMinutes": self.period_length_minutes,
            "isClockRunning": self.is_running,
        })
    }

    /// Decode from a remote node; corrupt fields fall back to defaults
    pub fn decode(node: &Value) -> MatchClock {
        MatchClock {
            period: Period::from_wire(&coerce::decode_string(node, "period", "0T")),
            elapsed: normalize(&coerce::decode_string(node, "elapsedTime", "00:00")),
            period_length_minutes: coerce::decode_u32(
                node,
                "periodLengthMinutes",
                DEFAULT_PERIOD_MINUTES,
            ),
            is_running: coerce::decode_bool(node, "isClockRunning", false),
        }
    }
}

/// Normalize raw elapsed-time text to two-digit-padded `"mm:ss"`.
///
/// Accepts `"mm:ss"`, the legacy letter-separator variant (`"45M30"`),
/// or a bare minute count; anything unparseable becomes `"00:00"`.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "00:00".to_string();
    }

    let separator = trimmed
        .char_indices()
        .find(|(_, c)| *c == ':' || c.is_ascii_alphabetic())
        .map(|(idx, _)| idx);

    match separator {
        Some(idx) => {
            let minutes = trimmed[..idx].trim();
            let seconds = trimmed[idx + 1..].trim();
            match (minutes.parse::<u32>(), seconds.parse::<u32>()) {
                (Ok(m), Ok(s)) => format!("{:02}:{:02}", m, s),
                (Ok(m), Err(_)) if seconds.is_empty() => format!("{:02}:00", m),
                _ => "00:00".to_string(),
            }
        }
        None => match trimmed.parse::<u32>() {
            Ok(m) => format!("{:02}:00", m),
            Err(_) => "00:00".to_string(),
        },
    }
}

/// Total seconds represented by normalized `"mm:ss"` text
pub fn elapsed_seconds(elapsed: &str) -> u32 {
    match elapsed.split_once(':') {
        Some((m, s)) => {
            let minutes = m.trim().parse::<u32>().unwrap_or(0);
            let seconds = s.trim().parse::<u32>().unwrap_or(0);
            minutes * 60 + seconds
        }
        None => 0,
    }
}

/// Render a second count as `"mm:ss"`
pub fn render_seconds(total: u32) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}
