//! Error codes for the Leela backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Roll value outside 1..=6
    InvalidRoll,
    /// Player id is empty, too long or contains unsupported characters
    InvalidPlayerId,
    /// Report text or plan number rejected
    InvalidReport,
    /// General validation error
    ValidationError,
    /// Malformed request body or parameters
    BadRequest,

    // Resource Not Found
    PlayerNotFound,
    NotFound,

    // Game flow
    /// A move is blocked until the pending report is submitted
    ReportRequired,
    /// Persisted state changed since it was loaded
    OptimisticLock,
    /// Event id already used for another workflow
    EventIdReused,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    /// A workflow step exhausted its retry budget
    WorkflowFailed,
    /// Notification could not be published
    PublishFailed,
    /// Persisted state violates a game invariant
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRoll => "INVALID_ROLL",
            Self::InvalidPlayerId => "INVALID_PLAYER_ID",
            Self::InvalidReport => "INVALID_REPORT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::ReportRequired => "REPORT_REQUIRED",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::EventIdReused => "EVENT_ID_REUSED",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::WorkflowFailed => "WORKFLOW_FAILED",
            Self::PublishFailed => "PUBLISH_FAILED",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
