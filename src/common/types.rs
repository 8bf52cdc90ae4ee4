//! Unified domain types shared across the sync layer

use serde::{Deserialize, Serialize};

use crate::state::clock::MatchClock;
use crate::state::scoreboard::ScoreBoard;
use crate::state::shootout::PenaltyShootout;

/// One of the two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Wire representation (1 or 2)
    pub fn as_number(&self) -> i64 {
        match self {
            Side::One => 1,
            Side::Two => 2,
        }
    }

    /// Decode from the wire representation, defaulting to side 1
    pub fn from_number(n: i64) -> Side {
        if n == 2 {
            Side::Two
        } else {
            Side::One
        }
    }

    /// The opposing side
    pub fn other(&self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// Tournament stage a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Group,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Stage {
    pub fn wire_code(&self) -> &'static str {
        match self {
            Stage::Group => "Group",
            Stage::QuarterFinal => "Quarter",
            Stage::SemiFinal => "Semi",
            Stage::Final => "Final",
        }
    }

    /// Decode from the wire representation, defaulting to the group stage
    pub fn from_wire(code: &str) -> Stage {
        match code {
            "Quarter" => Stage::QuarterFinal,
            "Semi" => Stage::SemiFinal,
            "Final" => Stage::Final,
            _ => Stage::Group,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_code())
    }
}

/// A team in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group_id: String,
}

/// A tournament group and its standings counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team_ids: Vec<String>,
}

/// Match identity and scheduling data, owned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Match {
    pub tournament_id: String,
    pub match_id: String,
    pub team1_id: String,
    pub team1_name: String,
    pub team2_id: String,
    pub team2_name: String,
    /// Scheduled date as text in one of the tolerated formats
    pub date: String,
    /// Scheduled kickoff time as text
    pub time: String,
    pub venue: String,
    pub stage: Option<Stage>,
}

/// A full match document: identity plus the live sub-entities
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchDocument {
    pub info: Match,
    pub clock: MatchClock,
    pub score: ScoreBoard,
    pub shootout: PenaltyShootout,
}

/// Assigned tournament/match pointers for an operator account
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPermissions {
    pub assigned_tournament_id: Option<String>,
    pub assigned_match_id: Option<String>,
}

/// Coarse match status published to the LiveMatch projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Paused,
    Finished,
}

impl MatchStatus {
    pub fn wire_code(&self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "NotStarted",
            MatchStatus::InProgress => "InProgress",
            MatchStatus::Paused => "Paused",
            MatchStatus::Finished => "Finished",
        }
    }

    pub fn from_wire(code: &str) -> MatchStatus {
        match code {
            "InProgress" => MatchStatus::InProgress,
            "Paused" => MatchStatus::Paused,
            "Finished" => MatchStatus::Finished,
            _ => MatchStatus::NotStarted,
        }
    }
}

impl Default for MatchStatus {
    fn default() -> Self {
        MatchStatus::NotStarted
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_code())
    }
}

/// The single live-match projection document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveMatchState {
    pub team1_name: String,
    pub team2_name: String,
    pub goals1: u32,
    pub goals2: u32,
    /// Normalized "mm:ss" text
    pub elapsed_time: String,
    pub is_clock_running: bool,
    pub match_status: MatchStatus,
    pub yellow_cards1: u32,
    pub yellow_cards2: u32,
    pub red_cards1: u32,
    pub red_cards2: u32,
    pub penalties1: u32,
    pub penalties2: u32,
    /// Epoch millis of the last publisher update
    pub last_update_timestamp: i64,
}

impl Default for LiveMatchState {
    fn default() -> Self {
        Self {
            team1_name: String::new(),
            team2_name: String::new(),
            goals1: 0,
            goals2: 0,
            elapsed_time: "00:00".to_string(),
            is_clock_running: false,
            match_status: MatchStatus::NotStarted,
            yellow_cards1: 0,
            yellow_cards2: 0,
            red_cards1: 0,
            red_cards2: 0,
            penalties1: 0,
            penalties2: 0,
            last_update_timestamp: 0,
        }
    }
}

/// A raw snapshot pushed by the remote store for a watched path
#[derive(Debug, Clone, PartialEq)]
pub struct DocSnapshot {
    pub path: String,
    pub value: serde_json::Value,
}

/// Strongly-typed local representation of a remote document,
/// produced by running a snapshot through the coercion layer
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedEntity {
    LiveMatch(LiveMatchState),
    MatchInfo(Box<MatchDocument>),
    Team(Team),
    Group(Group),
    Permissions(UserPermissions),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_round_trip() {
        assert_eq!(Side::from_number(Side::One.as_number()), Side::One);
        assert_eq!(Side::from_number(Side::Two.as_number()), Side::Two);
        assert_eq!(Side::One.other(), Side::Two);
        // anything that is not 2 falls back to side 1
        assert_eq!(Side::from_number(0), Side::One);
        assert_eq!(Side::from_number(99), Side::One);
    }

    #[test]
    fn test_stage_wire_codes() {
        assert_eq!(Stage::from_wire("Semi"), Stage::SemiFinal);
        assert_eq!(Stage::from_wire("unknown"), Stage::Group);
        assert_eq!(Stage::Final.wire_code(), "Final");
    }

    #[test]
    fn test_match_status_default() {
        assert_eq!(MatchStatus::default(), MatchStatus::NotStarted);
        assert_eq!(MatchStatus::from_wire("Paused"), MatchStatus::Paused);
        assert_eq!(MatchStatus::from_wire(""), MatchStatus::NotStarted);
    }

    #[test]
    fn test_live_match_default_elapsed() {
        let live = LiveMatchState::default();
        assert_eq!(live.elapsed_time, "00:00");
        assert_eq!(live.match_status, MatchStatus::NotStarted);
    }
}
