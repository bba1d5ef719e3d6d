use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Contract violations raised by the pure game rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Roll value outside 1..=6.
    InvalidRoll(i32),
    /// A roll was attempted while a report is still owed.
    ReportPending,
    /// Persisted state breaks a rule invariant.
    CorruptState(String),
    /// Player id failed boundary validation.
    InvalidPlayerId(String),
    /// Snake or arrow tables break the board's structural rules.
    InvalidBoard(String),
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RuleError::InvalidRoll(v) => write!(f, "roll must be between 1 and 6, got {v}"),
            RuleError::ReportPending => write!(f, "a report must be submitted before rolling"),
            RuleError::CorruptState(s) => write!(f, "corrupt player state: {s}"),
            RuleError::InvalidPlayerId(s) => write!(f, "invalid player id: {s}"),
            RuleError::InvalidBoard(s) => write!(f, "invalid board: {s}"),
        }
    }
}

impl Error for RuleError {}
