//! Entity decoders: remote snapshots to strongly-typed local entities.
//!
//! Each decoder is a composition of per-field coercion calls, so a
//! corrupt field (or a whole corrupt sub-entity) decodes to its default
//! value without blanking the siblings. Decoders never fail.

use serde_json::{json, Value};

use super::paths::DocPath;
use crate::coerce;
use crate::common::types::{
    DecodedEntity, Group, LiveMatchState, Match, MatchDocument, MatchStatus, Stage, Team,
    UserPermissions,
};
use crate::state::clock::MatchClock;
use crate::state::scoreboard::ScoreBoard;
use crate::state::shootout::PenaltyShootout;

/// Dispatch a snapshot to the decoder for its logical path
pub fn decode_entity(path: &DocPath, value: &Value) -> DecodedEntity {
    match path {
        DocPath::LiveMatch => DecodedEntity::LiveMatch(decode_live_match(value)),
        DocPath::Match { .. } => DecodedEntity::MatchInfo(Box::new(decode_match_document(value))),
        DocPath::Team { .. } => DecodedEntity::Team(decode_team(value)),
        DocPath::Group { .. } => DecodedEntity::Group(decode_group(value)),
        DocPath::Permissions { .. } => DecodedEntity::Permissions(decode_permissions(value)),
    }
}

/// Decode the LiveMatch projection document
pub fn decode_live_match(node: &Value) -> LiveMatchState {
    LiveMatchState {
        team1_name: coerce::decode_string(node, "team1Name", ""),
        team2_name: coerce::decode_string(node, "team2Name", ""),
        goals1: coerce::decode_u32(node, "goals1", 0),
        goals2: coerce::decode_u32(node, "goals2", 0),
        elapsed_time: crate::state::clock::normalize(&coerce::decode_string(
            node,
            "elapsedTime",
            "00:00",
        )),
        is_clock_running: coerce::decode_bool(node, "isClockRunning", false),
        match_status: MatchStatus::from_wire(&coerce::decode_string(
            node,
            "matchStatus",
            "NotStarted",
        )),
        yellow_cards1: coerce::decode_u32(node, "yellowCards1", 0),
        yellow_cards2: coerce::decode_u32(node, "yellowCards2", 0),
        red_cards1: coerce::decode_u32(node, "redCards1", 0),
        red_cards2: coerce::decode_u32(node, "redCards2", 0),
        penalties1: coerce::decode_u32(node, "penalties1", 0),
        penalties2: coerce::decode_u32(node, "penalties2", 0),
        last_update_timestamp: coerce::decode_i64(node, "lastUpdateTimestamp", 0),
    }
}

/// Encode the LiveMatch projection document
pub fn encode_live_match(live: &LiveMatchState) -> Value {
    json!({
        "team1Name": live.team1_name,
        "team2Name": live.team2_name,
        "goals1": live.goals1,
        "goals2": live.goals2,
        "elapsedTime": live.elapsed_time,
        "isClockRunning": live.is_clock_running,
        "matchStatus": live.match_status.wire_code(),
        "yellowCards1": live.yellow_cards1,
        "yellowCards2": live.yellow_cards2,
        "redCards1": live.red_cards1,
        "redCards2": live.red_cards2,
        "penalties1": live.penalties1,
        "penalties2": live.penalties2,
        "lastUpdateTimestamp": live.last_update_timestamp,
    })
}

/// Decode a full match document: identity plus live sub-entities
pub fn decode_match_document(node: &Value) -> MatchDocument {
    MatchDocument {
        info: decode_match_info(node),
        clock: MatchClock::decode(node),
        score: ScoreBoard::decode(node),
        shootout: PenaltyShootout::decode(node),
    }
}

/// Decode the catalog-owned match identity fields
pub fn decode_match_info(node: &Value) -> Match {
    let stage = node
        .get("stage")
        .map(|_| Stage::from_wire(&coerce::decode_string(node, "stage", "Group")));

    Match {
        tournament_id: coerce::decode_string(node, "tournamentId", ""),
        match_id: coerce::decode_string(node, "matchId", ""),
        team1_id: coerce::decode_string(node, "team1Id", ""),
        team1_name: coerce::decode_string(node, "team1Name", ""),
        team2_id: coerce::decode_string(node, "team2Id", ""),
        team2_name: coerce::decode_string(node, "team2Name", ""),
        date: coerce::decode_string(node, "date", ""),
        time: coerce::decode_string(node, "time", ""),
        venue: coerce::decode_string(node, "venue", ""),
        stage,
    }
}

pub fn decode_team(node: &Value) -> Team {
    Team {
        id: coerce::decode_string(node, "id", ""),
        name: coerce::decode_string(node, "name", ""),
        group_id: coerce::decode_string(node, "groupId", ""),
    }
}

pub fn decode_group(node: &Value) -> Group {
    let team_ids = node
        .get("teamIds")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Group {
        id: coerce::decode_string(node, "id", ""),
        name: coerce::decode_string(node, "name", ""),
        team_ids,
    }
}

pub fn decode_permissions(node: &Value) -> UserPermissions {
    let non_empty = |field: &str| {
        let text = coerce::decode_string(node, field, "");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    };

    UserPermissions {
        assigned_tournament_id: non_empty("assignedTournamentId"),
        assigned_match_id: non_empty("assignedMatchId"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Side;
    use crate::state::clock::Period;

    #[test]
    fn test_decode_live_match_weak_typing() {
        let node = json!({
            "team1Name": "Rovers",
            "team2Name": "United",
            "goals1": "2",
            "goals2": 1.0,
            "elapsedTime": "5:3",
            "isClockRunning": "true",
            "matchStatus": "InProgress",
            "lastUpdateTimestamp": "1736500000000",
        });

        let live = decode_live_match(&node);
        assert_eq!(live.goals1, 2);
        assert_eq!(live.goals2, 1);
        assert_eq!(live.elapsed_time, "05:03");
        assert!(live.is_clock_running);
        assert_eq!(live.match_status, MatchStatus::InProgress);
        assert_eq!(live.last_update_timestamp, 1_736_500_000_000);
        // absent counters default to zero
        assert_eq!(live.yellow_cards1, 0);
    }

    #[test]
    fn test_live_match_round_trip() {
        let live = LiveMatchState {
            team1_name: "Rovers".to_string(),
            team2_name: "United".to_string(),
            goals1: 3,
            goals2: 2,
            elapsed_time: "88:10".to_string(),
            is_clock_running: true,
            match_status: MatchStatus::InProgress,
            yellow_cards1: 1,
            yellow_cards2: 2,
            red_cards1: 0,
            red_cards2: 1,
            penalties1: 0,
            penalties2: 0,
            last_update_timestamp: 1_736_500_000_000,
        };
        assert_eq!(decode_live_match(&encode_live_match(&live)), live);
    }

    #[test]
    fn test_corrupt_sub_entity_does_not_blank_siblings() {
        // the clock fields are garbage; score and shootout must still decode
        let node = json!({
            "period": ["not", "a", "string"],
            "elapsedTime": { "oops": true },
            "goals1": 2,
            "goals2": "1",
            "penaltiesActive": true,
            "penaltyHistory1": "GG",
            "penaltyHistory2": "M",
        });

        let doc = decode_match_document(&node);
        assert_eq!(doc.clock.period, Period::NotStarted);
        assert_eq!(doc.clock.elapsed, "00:00");
        assert_eq!(doc.score.side1.goals, 2);
        assert_eq!(doc.score.side2.goals, 1);
        assert!(doc.shootout.active);
        assert_eq!(doc.shootout.score1, 2);
    }

    #[test]
    fn test_decode_match_info() {
        let node = json!({
            "tournamentId": "T1",
            "matchId": "M7",
            "team1Name": "Rovers",
            "team2Name": "United",
            "date": "2025-01-10",
            "time": "18:30",
            "venue": "Pitch 2",
            "stage": "Semi",
            "penaltyInitiator": 2,
        });

        let doc = decode_match_document(&node);
        assert_eq!(doc.info.tournament_id, "T1");
        assert_eq!(doc.info.stage, Some(Stage::SemiFinal));
        assert_eq!(doc.shootout.initiating_side, Side::Two);
    }

    #[test]
    fn test_decode_permissions_empty_is_none() {
        let node = json!({ "assignedTournamentId": "", "assignedMatchId": "M7" });
        let permissions = decode_permissions(&node);
        assert_eq!(permissions.assigned_tournament_id, None);
        assert_eq!(permissions.assigned_match_id, Some("M7".to_string()));
    }

    #[test]
    fn test_decode_entity_dispatch() {
        let entity = decode_entity(&DocPath::LiveMatch, &json!({}));
        assert!(matches!(entity, DecodedEntity::LiveMatch(_)));

        let entity = decode_entity(&DocPath::match_doc("T1", "M7"), &json!({}));
        assert!(matches!(entity, DecodedEntity::MatchInfo(_)));

        let entity = decode_entity(&DocPath::permissions("operator1"), &json!(null));
        assert!(matches!(entity, DecodedEntity::Permissions(_)));
    }
}
