use std::fmt;

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

use crate::domain::board::{MAX_ROLL, TOTAL_CELLS, WIN_CELL};
use crate::domain::errors::RuleError;

/// Opaque player identifier, validated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub const MAX_LEN: usize = 64;

    pub fn parse(raw: impl Into<String>) -> Result<Self, RuleError> {
        let raw = raw.into();
        if raw.len() > Self::MAX_LEN {
            return Err(RuleError::InvalidPlayerId(format!(
                "longer than {} characters",
                Self::MAX_LEN
            )));
        }
        if !regex_is_match!(r"^[A-Za-z0-9][A-Za-z0-9_.:@-]*$", &raw) {
            return Err(RuleError::InvalidPlayerId(
                "expected letters, digits, '_', '.', ':', '@' or '-'".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PlayerId> for String {
    fn from(value: PlayerId) -> Self {
        value.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single die face. Construction is the only validation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct RollValue(i32);

impl RollValue {
    pub fn new(value: i32) -> Result<Self, RuleError> {
        if (1..=MAX_ROLL).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RuleError::InvalidRoll(value))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_max(self) -> bool {
        self.0 == MAX_ROLL
    }
}

impl TryFrom<i32> for RollValue {
    type Error = RuleError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RollValue> for i32 {
    fn from(value: RollValue) -> Self {
        value.0
    }
}

/// How the player arrived at the destination cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    Step,
    Snake,
    Arrow,
    Win,
    Stop,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Step => "STEP",
            TransitionKind::Snake => "SNAKE",
            TransitionKind::Arrow => "ARROW",
            TransitionKind::Win => "WIN",
            TransitionKind::Stop => "STOP",
        }
    }
}

/// Durable per-player game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: i32,
    pub previous_position: i32,
    pub consecutive_sixes: i32,
    pub position_before_streak: i32,
    pub is_finished: bool,
    pub needs_report: bool,
    pub message: Option<String>,
    pub email: Option<String>,
    /// Bumped on every persisted write; guards against lost updates.
    pub version: i32,
}

impl PlayerState {
    /// Fresh player parked on the win cell, waiting for a six.
    pub fn awaiting_start(id: PlayerId) -> Self {
        Self {
            id,
            position: WIN_CELL,
            previous_position: WIN_CELL,
            consecutive_sixes: 0,
            position_before_streak: WIN_CELL,
            is_finished: true,
            needs_report: false,
            message: None,
            email: None,
            version: 0,
        }
    }

    pub fn is_dormant(&self) -> bool {
        self.is_finished && self.position == WIN_CELL
    }

    /// Reject states that no sequence of legal moves can produce.
    pub fn check_invariants(&self) -> Result<(), RuleError> {
        if !(0..=2).contains(&self.consecutive_sixes) {
            return Err(RuleError::CorruptState(format!(
                "consecutive_sixes={} outside 0..=2",
                self.consecutive_sixes
            )));
        }
        for (name, cell) in [
            ("position", self.position),
            ("previous_position", self.previous_position),
            ("position_before_streak", self.position_before_streak),
        ] {
            if !(1..=TOTAL_CELLS).contains(&cell) {
                return Err(RuleError::CorruptState(format!(
                    "{name}={cell} outside 1..={TOTAL_CELLS}"
                )));
            }
        }
        if self.is_finished && self.position != WIN_CELL {
            return Err(RuleError::CorruptState(format!(
                "finished player resting on {} instead of {WIN_CELL}",
                self.position
            )));
        }
        Ok(())
    }
}

/// Inputs handed to the narrative generator after a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeContext {
    pub current_cell: i32,
    pub previous_cell: i32,
    pub roll: i32,
    pub transition_kind: TransitionKind,
    pub is_finished: bool,
    pub consecutive_sixes: i32,
}

/// Outcome of one roll, ready to be projected onto the player's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    pub destination_cell: i32,
    pub previous_cell: i32,
    pub transition_kind: TransitionKind,
    pub consecutive_sixes: i32,
    pub position_before_streak: i32,
    pub is_finished: bool,
    pub needs_report: bool,
    pub narrative_context: NarrativeContext,
}

impl MoveResult {
    /// Next persisted state: the move applied, the message replaced and the
    /// version bumped.
    pub fn apply_to(&self, state: &PlayerState, message: Option<String>) -> PlayerState {
        PlayerState {
            id: state.id.clone(),
            position: self.destination_cell,
            previous_position: self.previous_cell,
            consecutive_sixes: self.consecutive_sixes,
            position_before_streak: self.position_before_streak,
            is_finished: self.is_finished,
            needs_report: self.needs_report,
            message,
            email: state.email.clone(),
            version: state.version + 1,
        }
    }
}
