//! Per-side match counters: goals, cards, corners.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::coerce;
use crate::common::types::Side;

/// The counters an operator can adjust during a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    Goals,
    YellowCards,
    RedCards,
    Corners,
}

/// Counters for one side. All values are non-negative; decrementing a
/// counter that is already zero is a no-op, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideScore {
    pub goals: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub corners: u32,
}

impl SideScore {
    pub fn get(&self, kind: CounterKind) -> u32 {
        match kind {
            CounterKind::Goals => self.goals,
            CounterKind::YellowCards => self.yellow_cards,
            CounterKind::RedCards => self.red_cards,
            CounterKind::Corners => self.corners,
        }
    }

    fn slot(&mut self, kind: CounterKind) -> &mut u32 {
        match kind {
            CounterKind::Goals => &mut self.goals,
            CounterKind::YellowCards => &mut self.yellow_cards,
            CounterKind::RedCards => &mut self.red_cards,
            CounterKind::Corners => &mut self.corners,
        }
    }

    pub fn increment(&mut self, kind: CounterKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(1);
    }

    /// Saturates at zero
    pub fn decrement(&mut self, kind: CounterKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_sub(1);
    }
}

/// Both sides' counters for one match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub side1: SideScore,
    pub side2: SideScore,
}

impl ScoreBoard {
    pub fn side(&self, side: Side) -> &SideScore {
        match side {
            Side::One => &self.side1,
            Side::Two => &self.side2,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideScore {
        match side {
            Side::One => &mut self.side1,
            Side::Two => &mut self.side2,
        }
    }

    /// Apply a single +1/-1 delta to one counter. Negative deltas at a
    /// zero counter are absorbed silently.
    pub fn apply(&mut self, side: Side, kind: CounterKind, delta: i32) {
        let score = self.side_mut(side);
        if delta >= 0 {
            score.increment(kind);
        } else {
            score.decrement(kind);
        }
    }

    /// Encode to the match document's wire fields
    pub fn encode(&self) -> Value {
        json!({
            "goals1": self.side1.goals,
            "goals2": self.side2.goals,
            "yellowCards1": self.side1.yellow_cards,
            "yellowCards2": self.side2.yellow_cards,
            "redCards1": self.side1.red_cards,
            "redCards2": self.side2.red_cards,
            "corners1": self.side1.corners,
            "corners2": self.side2.corners,
        })
    }

    /// Decode from a remote node; corrupt fields fall back to zero
    pub fn decode(node: &Value) -> ScoreBoard {
        ScoreBoard {
            side1: SideScore {
                goals: coerce::decode_u32(node, "goals1", 0),
                yellow_cards: coerce::decode_u32(node, "yellowCards1", 0),
                red_cards: coerce::decode_u32(node, "redCards1", 0),
                corners: coerce::decode_u32(node, "corners1", 0),
            },
            side2: SideScore {
                goals: coerce::decode_u32(node, "goals2", 0),
                yellow_cards: coerce::decode_u32(node, "yellowCards2", 0),
                red_cards: coerce::decode_u32(node, "redCards2", 0),
                corners: coerce::decode_u32(node, "corners2", 0),
            },
        }
    }
}
