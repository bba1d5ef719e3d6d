use thiserror::Error;

use crate::domain::errors::RuleError;
use crate::domain::state::PlayerId;
use crate::errors::domain::DomainError;
use crate::workflow::run::WorkflowState;

/// Why a workflow instance stopped without reaching `DONE`.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("player {player_id} must submit a report for the last move before rolling again")]
    ReportRequired { player_id: PlayerId },
    #[error("player {player_id} not found")]
    NotFound { player_id: PlayerId },
    #[error("stored state for player {player_id} is corrupt: {detail}")]
    Corrupt { player_id: PlayerId, detail: String },
    #[error("conflict: {0}")]
    Conflict(#[source] DomainError),
    #[error("step {step} failed after {attempts} attempt(s): {source}")]
    StepFailed {
        step: WorkflowState,
        attempts: u32,
        #[source]
        source: DomainError,
    },
}

impl WorkflowError {
    /// Map a rule rejection raised while applying logic for `player_id`.
    pub fn from_rule(player_id: &PlayerId, err: RuleError) -> Self {
        match err {
            RuleError::ReportPending => Self::ReportRequired {
                player_id: player_id.clone(),
            },
            RuleError::CorruptState(detail) => Self::Corrupt {
                player_id: player_id.clone(),
                detail,
            },
            other => Self::InvalidInput(other.to_string()),
        }
    }
}
