//! Persisted step-state record for one workflow instance.
//!
//! A run is keyed by the inbound event id. It records the last step that
//! finished, the values produced so far, and the failure (if any), so a
//! redelivered event can be answered or resumed without repeating work that
//! already committed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::state::{MoveResult, PlayerId, PlayerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Roll,
    Report,
    Init,
}

impl WorkflowKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Report => "report",
            Self::Init => "init",
        }
    }

    /// Ordered happy-path states for this kind, ending in `DONE`.
    pub const fn steps(self) -> &'static [WorkflowState] {
        match self {
            Self::Roll => &[
                WorkflowState::Received,
                WorkflowState::StateLoaded,
                WorkflowState::LogicApplied,
                WorkflowState::Persisted,
                WorkflowState::Notified,
                WorkflowState::Done,
            ],
            Self::Report => &[
                WorkflowState::Received,
                WorkflowState::StateLoaded,
                WorkflowState::ReportSaved,
                WorkflowState::Persisted,
                WorkflowState::Notified,
                WorkflowState::Done,
            ],
            Self::Init => &[
                WorkflowState::Received,
                WorkflowState::Persisted,
                WorkflowState::Notified,
                WorkflowState::Done,
            ],
        }
    }

    /// The step that follows `completed`, or `None` once the run is done.
    pub fn next_after(self, completed: WorkflowState) -> Option<WorkflowState> {
        let steps = self.steps();
        steps
            .iter()
            .position(|s| *s == completed)
            .and_then(|i| steps.get(i + 1).copied())
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roll" => Ok(Self::Roll),
            "report" => Ok(Self::Report),
            "init" => Ok(Self::Init),
            other => Err(format!("unknown workflow kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Received,
    StateLoaded,
    LogicApplied,
    ReportSaved,
    Persisted,
    Notified,
    Done,
    Failed,
}

impl WorkflowState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::StateLoaded => "STATE_LOADED",
            Self::LogicApplied => "LOGIC_APPLIED",
            Self::ReportSaved => "REPORT_SAVED",
            Self::Persisted => "PERSISTED",
            Self::Notified => "NOTIFIED",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    /// Position along the happy path. `LOGIC_APPLIED` and `REPORT_SAVED`
    /// share a slot since a run only ever visits one of them.
    const fn rank(self) -> u8 {
        match self {
            Self::Received => 0,
            Self::StateLoaded => 1,
            Self::LogicApplied | Self::ReportSaved => 2,
            Self::Persisted => 3,
            Self::Notified => 4,
            Self::Done => 5,
            Self::Failed => u8::MAX,
        }
    }

    pub fn is_at_or_past(self, other: WorkflowState) -> bool {
        self != Self::Failed && self.rank() >= other.rank()
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "RECEIVED" => Self::Received,
            "STATE_LOADED" => Self::StateLoaded,
            "LOGIC_APPLIED" => Self::LogicApplied,
            "REPORT_SAVED" => Self::ReportSaved,
            "PERSISTED" => Self::Persisted,
            "NOTIFIED" => Self::Notified,
            "DONE" => Self::Done,
            "FAILED" => Self::Failed,
            other => return Err(format!("unknown workflow state '{other}'")),
        })
    }
}

/// Values produced by completed steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded: Option<PlayerState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_result: Option<MoveResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PlayerState>,
    /// Whether the run changed persisted state.
    #[serde(default)]
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub id: String,
    pub kind: WorkflowKind,
    pub player_id: PlayerId,
    pub state: WorkflowState,
    pub completed: WorkflowState,
    pub attempts: u32,
    pub checkpoint: Checkpoint,
    pub last_error: Option<String>,
}

impl WorkflowRun {
    pub fn start(id: impl Into<String>, kind: WorkflowKind, player_id: PlayerId) -> Self {
        Self {
            id: id.into(),
            kind,
            player_id,
            state: WorkflowState::Received,
            completed: WorkflowState::Received,
            attempts: 0,
            checkpoint: Checkpoint::default(),
            last_error: None,
        }
    }

    /// Record that `step` finished. Steps must be taken in order.
    pub fn advance(&mut self, step: WorkflowState) {
        debug_assert_eq!(
            self.kind.next_after(self.completed),
            Some(step),
            "{} run {} skipped from {} to {}",
            self.kind,
            self.id,
            self.completed,
            step
        );
        self.completed = step;
        self.state = step;
        self.last_error = None;
    }

    pub fn fail(&mut self, error: impl fmt::Display) {
        self.state = WorkflowState::Failed;
        self.last_error = Some(error.to_string());
    }

    /// Forget progress so the run re-reads fresh state. Only safe while no
    /// state write can have been attempted.
    pub fn restart(&mut self) {
        self.state = WorkflowState::Received;
        self.completed = WorkflowState::Received;
        self.checkpoint = Checkpoint::default();
        self.last_error = None;
    }

    pub fn is_done(&self) -> bool {
        self.completed == WorkflowState::Done
    }

    /// The player state write has landed; later steps must not recompute it.
    pub fn is_committed(&self) -> bool {
        self.completed.is_at_or_past(WorkflowState::Persisted)
    }

    /// The state write is the next step. An earlier attempt may have landed
    /// without being acknowledged, so the recorded inputs must be reused
    /// rather than recomputed from fresh state.
    pub fn awaits_write(&self) -> bool {
        self.next_step() == Some(WorkflowState::Persisted)
    }

    pub fn next_step(&self) -> Option<WorkflowState> {
        self.kind.next_after(self.completed)
    }
}

/// Result of a handled inbound event, returned to the caller and replayed on
/// redelivery of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub kind: WorkflowKind,
    pub state: PlayerState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_result: Option<MoveResult>,
    pub changed: bool,
    /// Answered from a previously finished run.
    pub replayed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_strings_round_trip() {
        for kind in [WorkflowKind::Roll, WorkflowKind::Report, WorkflowKind::Init] {
            for step in kind.steps() {
                assert_eq!(step.as_str().parse::<WorkflowState>(), Ok(*step));
            }
            assert_eq!(kind.as_str().parse::<WorkflowKind>(), Ok(kind));
        }
        assert_eq!("FAILED".parse::<WorkflowState>(), Ok(WorkflowState::Failed));
        assert!("LOADED".parse::<WorkflowState>().is_err());
    }

    #[test]
    fn roll_sequence_follows_the_state_machine() {
        let mut run = WorkflowRun::start(
            "evt-1",
            WorkflowKind::Roll,
            PlayerId::parse("p1").unwrap(),
        );
        let mut seen = vec![run.state];
        while let Some(step) = run.next_step() {
            run.advance(step);
            seen.push(run.state);
        }
        assert_eq!(seen, WorkflowKind::Roll.steps());
        assert!(run.is_done());
        assert!(run.is_committed());
    }

    #[test]
    fn failure_keeps_completed_progress() {
        let mut run = WorkflowRun::start(
            "evt-2",
            WorkflowKind::Report,
            PlayerId::parse("p1").unwrap(),
        );
        run.advance(WorkflowState::StateLoaded);
        run.advance(WorkflowState::ReportSaved);
        run.fail("db down");
        assert_eq!(run.state, WorkflowState::Failed);
        assert_eq!(run.completed, WorkflowState::ReportSaved);
        assert!(!run.is_committed());
        assert_eq!(run.next_step(), Some(WorkflowState::Persisted));

        run.restart();
        assert_eq!(run.completed, WorkflowState::Received);
        assert_eq!(run.checkpoint, Checkpoint::default());
    }

    #[test]
    fn write_is_pending_only_right_before_persisted() {
        let mut run = WorkflowRun::start(
            "evt-3",
            WorkflowKind::Roll,
            PlayerId::parse("p1").unwrap(),
        );
        assert!(!run.awaits_write());
        run.advance(WorkflowState::StateLoaded);
        assert!(!run.awaits_write());
        run.advance(WorkflowState::LogicApplied);
        run.fail("lost ack");
        assert!(run.awaits_write());
        assert!(!run.is_committed());
        run.advance(WorkflowState::Persisted);
        assert!(!run.awaits_write());
    }

    #[test]
    fn failed_is_never_at_or_past_anything() {
        assert!(!WorkflowState::Failed.is_at_or_past(WorkflowState::Received));
        assert!(WorkflowState::Notified.is_at_or_past(WorkflowState::Persisted));
        assert!(!WorkflowState::LogicApplied.is_at_or_past(WorkflowState::Persisted));
    }
}
