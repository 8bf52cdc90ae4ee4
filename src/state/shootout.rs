//! Penalty shootout: turn-based state machine with sudden-death extension.
//!
//! Rounds are a display grouping only. Scores and histories are cumulative
//! across rounds and survive deactivation for audit; nothing ever resets
//! them except a fresh `activate`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::coerce;
use crate::common::errors::{Result, SyncError};
use crate::common::types::Side;

/// Minimum kicks per side before a winner can be determined
const REGULATION_KICKS: usize = 5;

/// Outcome of a single penalty kick, serialized as `G`/`M`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KickOutcome {
    Goal,
    Miss,
}

impl KickOutcome {
    fn wire_char(&self) -> char {
        match self {
            KickOutcome::Goal => 'G',
            KickOutcome::Miss => 'M',
        }
    }

    fn from_wire_char(c: char) -> Option<KickOutcome> {
        match c.to_ascii_uppercase() {
            'G' => Some(KickOutcome::Goal),
            'M' => Some(KickOutcome::Miss),
            _ => None,
        }
    }
}

/// What the recorded kicks determine so far.
///
/// Re-evaluated by the sync consumer after every kick; this is a pure
/// read over the shootout state, not something the shootout tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootoutVerdict {
    /// Not enough kicks taken yet
    Pending,
    /// Both sides have taken at least five kicks and remain tied
    NextRoundRequired,
    /// The named side has won
    Decided(Side),
}

/// Penalty shootout state for one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyShootout {
    pub active: bool,
    /// Fixed for the lifetime of an active shootout
    pub initiating_side: Side,
    /// Alternates after every recorded kick
    pub current_turn: Side,
    /// Display grouping counter, starts at 1
    pub round: u32,
    pub history_side1: Vec<KickOutcome>,
    pub history_side2: Vec<KickOutcome>,
    /// Count of GOAL entries in the matching history
    pub score1: u32,
    pub score2: u32,
}

impl Default for PenaltyShootout {
    fn default() -> Self {
        Self {
            active: false,
            initiating_side: Side::One,
            current_turn: Side::One,
            round: 1,
            history_side1: Vec::new(),
            history_side2: Vec::new(),
            score1: 0,
            score2: 0,
        }
    }
}

impl PenaltyShootout {
    /// Begin a shootout. Legal only while inactive; clears all histories
    /// and scores and fixes the initiating side.
    pub fn activate(&mut self, initiating_side: Side) -> Result<()> {
        if self.active {
            return Err(SyncError::illegal("shootout active", "activate"));
        }
        self.active = true;
        self.initiating_side = initiating_side;
        self.current_turn = initiating_side;
        self.round = 1;
        self.history_side1.clear();
        self.history_side2.clear();
        self.score1 = 0;
        self.score2 = 0;
        Ok(())
    }

    /// Record the current turn's kick and flip the turn
    pub fn record_kick(&mut self, outcome: KickOutcome) -> Result<()> {
        if !self.active {
            return Err(SyncError::illegal("shootout inactive", "record kick"));
        }
        match self.current_turn {
            Side::One => {
                self.history_side1.push(outcome);
                if outcome == KickOutcome::Goal {
                    self.score1 += 1;
                }
            }
            Side::Two => {
                self.history_side2.push(outcome);
                if outcome == KickOutcome::Goal {
                    self.score2 += 1;
                }
            }
        }
        self.current_turn = self.current_turn.other();
        Ok(())
    }

    /// Operator correction of the initiating side. The initiating side is
    /// immutable while a shootout is active, so this is legal only before
    /// activation or after full deactivation. Histories are untouched.
    pub fn correct_initiating_side(&mut self, side: Side) -> Result<()> {
        if self.active {
            return Err(SyncError::illegal("shootout active", "correct initiating side"));
        }
        self.initiating_side = side;
        self.current_turn = side;
        Ok(())
    }

    /// Operator correction of whose turn it is. Histories are untouched.
    pub fn correct_current_turn(&mut self, side: Side) -> Result<()> {
        if !self.active {
            return Err(SyncError::illegal("shootout inactive", "correct turn"));
        }
        self.current_turn = side;
        Ok(())
    }

    /// Open a sudden-death round. Legal only once both sides have taken at
    /// least five kicks and their scores are tied. Scores and histories
    /// carry over; only the turn resets to the initiating side.
    pub fn start_next_round(&mut self) -> Result<()> {
        if !self.active {
            return Err(SyncError::illegal("shootout inactive", "start next round"));
        }
        if evaluate(self) != ShootoutVerdict::NextRoundRequired {
            return Err(SyncError::illegal(
                "shootout not tied after regulation kicks",
                "start next round",
            ));
        }
        self.round += 1;
        self.current_turn = self.initiating_side;
        Ok(())
    }

    /// End the shootout, retaining all counters and histories for audit
    pub fn deactivate(&mut self) -> Result<()> {
        if !self.active {
            return Err(SyncError::illegal("shootout inactive", "deactivate"));
        }
        self.active = false;
        Ok(())
    }

    /// Encode to the match document's wire fields
    pub fn encode(&self) -> Value {
        json!({
            "penaltiesActive": self.active,
            "penaltyInitiator": self.initiating_side.as_number(),
            "penaltyTurn": self.current_turn.as_number(),
            "penaltyRound": self.round,
            "penaltyHistory1": encode_history(&self.history_side1),
            "penaltyHistory2": encode_history(&self.history_side2),
            "penaltyScore1": self.score1,
            "penaltyScore2": self.score2,
        })
    }

    /// Decode from a remote node. Scores are recomputed from the histories
    /// so the "score equals GOAL count" invariant holds regardless of what
    /// the wire claims; corrupt fields fall back to defaults.
    pub fn decode(node: &Value) -> PenaltyShootout {
        let history_side1 = decode_history(&coerce::decode_string(node, "penaltyHistory1", ""));
        let history_side2 = decode_history(&coerce::decode_string(node, "penaltyHistory2", ""));
        let score1 = goals_in(&history_side1);
        let score2 = goals_in(&history_side2);

        PenaltyShootout {
            active: coerce::decode_bool(node, "penaltiesActive", false),
            initiating_side: Side::from_number(coerce::decode_i64(node, "penaltyInitiator", 1)),
            current_turn: Side::from_number(coerce::decode_i64(node, "penaltyTurn", 1)),
            round: coerce::decode_u32(node, "penaltyRound", 1).max(1),
            history_side1,
            history_side2,
            score1,
            score2,
        }
    }
}

/// Determine the shootout verdict from the recorded kicks
pub fn evaluate(shootout: &PenaltyShootout) -> ShootoutVerdict {
    if shootout.history_side1.len() < REGULATION_KICKS
        || shootout.history_side2.len() < REGULATION_KICKS
    {
        return ShootoutVerdict::Pending;
    }
    match shootout.score1.cmp(&shootout.score2) {
        std::cmp::Ordering::Greater => ShootoutVerdict::Decided(Side::One),
        std::cmp::Ordering::Less => ShootoutVerdict::Decided(Side::Two),
        std::cmp::Ordering::Equal => ShootoutVerdict::NextRoundRequired,
    }
}

fn encode_history(history: &[KickOutcome]) -> String {
    history.iter().map(KickOutcome::wire_char).collect()
}

fn decode_history(text: &str) -> Vec<KickOutcome> {
    text.chars().filter_map(KickOutcome::from_wire_char).collect()
}

fn goals_in(history: &[KickOutcome]) -> u32 {
    history.iter().filter(|k| **k == KickOutcome::Goal).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_shootout() -> PenaltyShootout {
        let mut shootout = PenaltyShootout::default();
        shootout.activate(Side::One).unwrap();
        shootout
    }

    /// Record one kick per side, `REGULATION_KICKS` times
    fn record_pairs(shootout: &mut PenaltyShootout, side1: KickOutcome, side2: KickOutcome) {
        for _ in 0..REGULATION_KICKS {
            shootout.record_kick(side1).unwrap();
            shootout.record_kick(side2).unwrap();
        }
    }

    #[test]
    fn test_activate_resets_everything() {
        let mut shootout = active_shootout();
        record_pairs(&mut shootout, KickOutcome::Goal, KickOutcome::Miss);
        shootout.deactivate().unwrap();

        shootout.activate(Side::Two).unwrap();
        assert_eq!(shootout.initiating_side, Side::Two);
        assert_eq!(shootout.current_turn, Side::Two);
        assert_eq!(shootout.round, 1);
        assert!(shootout.history_side1.is_empty());
        assert_eq!(shootout.score1, 0);
    }

    #[test]
    fn test_activate_twice_is_illegal() {
        let mut shootout = active_shootout();
        assert!(shootout.activate(Side::Two).is_err());
        assert_eq!(shootout.initiating_side, Side::One);
    }

    #[test]
    fn test_turn_alternates_every_kick() {
        let mut shootout = active_shootout();
        assert_eq!(shootout.current_turn, Side::One);
        shootout.record_kick(KickOutcome::Goal).unwrap();
        assert_eq!(shootout.current_turn, Side::Two);
        shootout.record_kick(KickOutcome::Miss).unwrap();
        assert_eq!(shootout.current_turn, Side::One);
    }

    #[test]
    fn test_tied_after_regulation_requires_next_round() {
        let mut shootout = active_shootout();
        record_pairs(&mut shootout, KickOutcome::Goal, KickOutcome::Goal);

        assert_eq!(shootout.score1, 5);
        assert_eq!(shootout.score2, 5);
        assert_eq!(evaluate(&shootout), ShootoutVerdict::NextRoundRequired);

        shootout.start_next_round().unwrap();
        assert_eq!(shootout.round, 2);
        assert_eq!(shootout.current_turn, Side::One);
        // cumulative counters survive the round boundary
        assert_eq!(shootout.score1, 5);
        assert_eq!(shootout.history_side1.len(), 5);
    }

    #[test]
    fn test_decided_winner_blocks_next_round() {
        let mut shootout = active_shootout();
        record_pairs(&mut shootout, KickOutcome::Goal, KickOutcome::Goal);
        // side 2's fifth kick was a goal; replay the last pair as 5-4
        shootout.history_side2.pop();
        shootout.history_side2.push(KickOutcome::Miss);
        shootout.score2 = 4;

        assert_eq!(evaluate(&shootout), ShootoutVerdict::Decided(Side::One));
        assert!(shootout.start_next_round().is_err());
    }

    #[test]
    fn test_pending_before_regulation_kicks() {
        let mut shootout = active_shootout();
        shootout.record_kick(KickOutcome::Goal).unwrap();
        shootout.record_kick(KickOutcome::Miss).unwrap();
        assert_eq!(evaluate(&shootout), ShootoutVerdict::Pending);
        assert!(shootout.start_next_round().is_err());
    }

    #[test]
    fn test_sudden_death_stays_tied() {
        let mut shootout = active_shootout();
        record_pairs(&mut shootout, KickOutcome::Miss, KickOutcome::Miss);
        shootout.start_next_round().unwrap();

        shootout.record_kick(KickOutcome::Goal).unwrap();
        shootout.record_kick(KickOutcome::Goal).unwrap();
        assert_eq!(evaluate(&shootout), ShootoutVerdict::NextRoundRequired);

        shootout.start_next_round().unwrap();
        assert_eq!(shootout.round, 3);
    }

    #[test]
    fn test_correct_initiating_side_gating() {
        let mut shootout = PenaltyShootout::default();
        shootout.correct_initiating_side(Side::Two).unwrap();
        assert_eq!(shootout.initiating_side, Side::Two);

        shootout.activate(Side::Two).unwrap();
        assert!(shootout.correct_initiating_side(Side::One).is_err());
        assert_eq!(shootout.initiating_side, Side::Two);

        shootout.deactivate().unwrap();
        shootout.correct_initiating_side(Side::One).unwrap();
        assert_eq!(shootout.initiating_side, Side::One);
    }

    #[test]
    fn test_correct_turn_requires_active_and_keeps_history() {
        let mut shootout = active_shootout();
        shootout.record_kick(KickOutcome::Goal).unwrap();
        shootout.correct_current_turn(Side::One).unwrap();
        assert_eq!(shootout.current_turn, Side::One);
        assert_eq!(shootout.history_side1.len(), 1);

        shootout.deactivate().unwrap();
        assert!(shootout.correct_current_turn(Side::Two).is_err());
    }

    #[test]
    fn test_deactivate_retains_audit_state() {
        let mut shootout = active_shootout();
        record_pairs(&mut shootout, KickOutcome::Goal, KickOutcome::Miss);
        shootout.deactivate().unwrap();

        assert!(!shootout.active);
        assert_eq!(shootout.score1, 5);
        assert_eq!(shootout.history_side2.len(), 5);
    }

    #[test]
    fn test_record_kick_while_inactive_is_illegal() {
        let mut shootout = PenaltyShootout::default();
        assert!(shootout.record_kick(KickOutcome::Goal).is_err());
        assert!(shootout.history_side1.is_empty());
    }

    #[test]
    fn test_wire_round_trip_recomputes_scores() {
        let mut shootout = active_shootout();
        record_pairs(&mut shootout, KickOutcome::Goal, KickOutcome::Miss);

        let decoded = PenaltyShootout::decode(&shootout.encode());
        assert_eq!(decoded, shootout);

        // a wire score out of step with the history loses
        let mut tampered = shootout.encode();
        tampered["penaltyScore1"] = serde_json::json!(99);
        assert_eq!(PenaltyShootout::decode(&tampered).score1, 5);
    }

    #[test]
    fn test_decode_tolerates_weak_typing() {
        let node = serde_json::json!({
            "penaltiesActive": "true",
            "penaltyInitiator": "2",
            "penaltyTurn": 1.0,
            "penaltyRound": "2",
            "penaltyHistory1": "gMg",
            "penaltyHistory2": "x",
        });
        let shootout = PenaltyShootout::decode(&node);
        assert!(shootout.active);
        assert_eq!(shootout.initiating_side, Side::Two);
        assert_eq!(shootout.current_turn, Side::One);
        assert_eq!(shootout.round, 2);
        assert_eq!(shootout.history_side1.len(), 3);
        assert_eq!(shootout.score1, 2);
        assert!(shootout.history_side2.is_empty());
    }
}
