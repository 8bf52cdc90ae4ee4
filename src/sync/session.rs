//! Live match session: the context object a scoreboard screen drives.
//!
//! Replaces the source system's process-wide "currently selected
//! tournament/match" state: each screen owns one session, scoped to its
//! lifetime, and teardown cancels everything the session subscribed to.
//!
//! Command methods are optimistic: local state mutates immediately and
//! the remote write goes out separately. A failed write is surfaced
//! through the returned ack but never rolls the local state back.

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::decoders::encode_live_match;
use super::manager::{Subscription, SyncManager, WriteAck};
use super::paths::DocPath;
use crate::common::errors::Result;
use crate::common::traits::DocumentStore;
use crate::common::types::{DecodedEntity, LiveMatchState, Match, Side};
use crate::expiry;
use crate::state::clock::MatchClock;
use crate::state::scoreboard::{CounterKind, ScoreBoard};
use crate::state::shootout::{evaluate, KickOutcome, PenaltyShootout, ShootoutVerdict};

/// Clock commands the operator can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    Start,
    Stop,
    Adjust(i64),
}

/// Shootout commands the operator can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyCommand {
    Activate(Side),
    RecordKick(KickOutcome),
    CorrectInitiatingSide(Side),
    CorrectTurn(Side),
    StartNextRound,
    Deactivate,
}

/// What the expiry check decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// The assignment is still valid
    Active,
    /// The assignment was stale; pointers were cleared (best-effort) and
    /// the caller should redirect to the default landing view
    Revoked,
}

/// One operator's live session on one match
pub struct LiveMatchSession {
    tournament_id: String,
    match_id: String,
    username: Option<String>,
    manager: SyncManager,
    info: Match,
    clock: MatchClock,
    score: ScoreBoard,
    shootout: PenaltyShootout,
}

impl LiveMatchSession {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        root: &str,
        tournament_id: &str,
        match_id: &str,
    ) -> Self {
        Self {
            tournament_id: tournament_id.to_string(),
            match_id: match_id.to_string(),
            username: None,
            manager: SyncManager::new(store, root),
            info: Match::default(),
            clock: MatchClock::default(),
            score: ScoreBoard::default(),
            shootout: PenaltyShootout::default(),
        }
    }

    /// Set the operator account used for permission revocation
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    fn match_path(&self) -> DocPath {
        DocPath::match_doc(&self.tournament_id, &self.match_id)
    }

    /// Prime local state from the match document and open the live stream.
    ///
    /// Calling this again simply replaces the previous stream; the manager
    /// guarantees a single live subscription for the path.
    #[instrument(skip(self))]
    pub async fn subscribe_to_live_match(&mut self) -> Result<Subscription> {
        if let DecodedEntity::MatchInfo(doc) = self.manager.read_once(&self.match_path()).await? {
            info!(
                tournament = %self.tournament_id,
                match_id = %self.match_id,
                "primed local state from match document"
            );
            self.info = doc.info;
            self.clock = doc.clock;
            self.score = doc.score;
            self.shootout = doc.shootout;
        }
        self.manager.observe(&self.match_path()).await
    }

    /// Fold an inbound remote snapshot into the locally-owned entities
    pub fn apply_snapshot(&mut self, entity: &DecodedEntity) {
        if let DecodedEntity::MatchInfo(doc) = entity {
            self.info = doc.info.clone();
            self.clock = doc.clock.clone();
            self.score = doc.score;
            self.shootout = doc.shootout.clone();
        }
    }

    /// Adjust one counter by +1/-1 and publish
    pub fn apply_score_delta(&mut self, side: Side, kind: CounterKind, delta: i32) -> WriteAck {
        self.score.apply(side, kind, delta);
        self.publish()
    }

    /// Drive the match clock and publish. An illegal transition is
    /// returned to the caller and nothing is written.
    pub fn apply_clock_command(&mut self, command: ClockCommand) -> Result<WriteAck> {
        match command {
            ClockCommand::Start => self.clock.start()?,
            ClockCommand::Stop => self.clock.stop()?,
            ClockCommand::Adjust(delta) => self.clock.adjust(delta)?,
        }
        Ok(self.publish())
    }

    /// Drive the penalty shootout and publish. An illegal transition is
    /// returned to the caller and nothing is written.
    pub fn apply_penalty_command(&mut self, command: PenaltyCommand) -> Result<WriteAck> {
        match command {
            PenaltyCommand::Activate(side) => self.shootout.activate(side)?,
            PenaltyCommand::RecordKick(outcome) => self.shootout.record_kick(outcome)?,
            PenaltyCommand::CorrectInitiatingSide(side) => {
                self.shootout.correct_initiating_side(side)?
            }
            PenaltyCommand::CorrectTurn(side) => self.shootout.correct_current_turn(side)?,
            PenaltyCommand::StartNextRound => self.shootout.start_next_round()?,
            PenaltyCommand::Deactivate => self.shootout.deactivate()?,
        }
        Ok(self.publish())
    }

    /// Current shootout verdict; the screen re-checks this after every kick
    pub fn shootout_verdict(&self) -> ShootoutVerdict {
        evaluate(&self.shootout)
    }

    /// Check the scheduled date against `today` and, when stale, clear the
    /// operator's assignment pointers. The removal is best-effort: a
    /// failure is logged, the revocation outcome still stands and the
    /// caller redirects either way.
    pub async fn check_and_revoke_if_expired(&mut self, today: NaiveDate) -> RevocationOutcome {
        if !expiry::is_expired(&self.info.date, today) {
            return RevocationOutcome::Active;
        }

        info!(
            match_id = %self.match_id,
            date = %self.info.date,
            "match assignment expired, revoking"
        );
        if let Some(username) = self.username.clone() {
            let ack = self.manager.remove_once(&DocPath::permissions(&username));
            match ack.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(user = %username, "assignment removal failed: {}", e),
                Err(_) => warn!(user = %username, "assignment removal outcome was dropped"),
            }
        }
        RevocationOutcome::Revoked
    }

    /// The LiveMatch projection of the current local state
    pub fn live_projection(&self) -> LiveMatchState {
        LiveMatchState {
            team1_name: self.info.team1_name.clone(),
            team2_name: self.info.team2_name.clone(),
            goals1: self.score.side1.goals,
            goals2: self.score.side2.goals,
            elapsed_time: self.clock.elapsed.clone(),
            is_clock_running: self.clock.is_running,
            match_status: self.clock.status(),
            yellow_cards1: self.score.side1.yellow_cards,
            yellow_cards2: self.score.side2.yellow_cards,
            red_cards1: self.score.side1.red_cards,
            red_cards2: self.score.side2.red_cards,
            penalties1: self.shootout.score1,
            penalties2: self.shootout.score2,
            last_update_timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Merge the live sub-entities into the match document and refresh the
    /// LiveMatch projection. The projection write is best-effort (warn on
    /// failure inside the manager); the match-document ack is returned.
    fn publish(&self) -> WriteAck {
        let mut fields = self.clock.encode();
        merge_into(&mut fields, self.score.encode());
        merge_into(&mut fields, self.shootout.encode());

        let ack = self.manager.write_once(&self.match_path(), fields);
        let _ = self.manager.write_once(
            &DocPath::LiveMatch,
            encode_live_match(&self.live_projection()),
        );
        ack
    }

    /// Cancel every subscription this session opened
    pub fn shutdown(&mut self) {
        self.manager.shutdown();
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn shootout(&self) -> &PenaltyShootout {
        &self.shootout
    }

    pub fn match_info(&self) -> &Match {
        &self.info
    }
}

fn merge_into(target: &mut Value, source: Value) {
    if let (Value::Object(fields), Value::Object(extra)) = (target, source) {
        fields.extend(extra);
    }
}
