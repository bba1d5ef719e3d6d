//! Inbound events and their boundary validation.
//!
//! The wire format is a JSON object tagged by `type`. Values are kept loose
//! on the wire (`i64`, raw strings) so out-of-range input is reported with a
//! precise error code instead of a generic deserialization failure; pure game
//! code only ever sees the validated [`Command`].

use lazy_regex::regex_is_match;
use serde::Deserialize;

use crate::domain::board::TOTAL_CELLS;
use crate::domain::state::{PlayerId, RollValue};
use crate::error::AppError;
use crate::errors::ErrorCode;

pub const MAX_REPORT_CHARS: usize = 10_000;
pub const MAX_EVENT_ID_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundEvent {
    #[serde(rename = "dice.roll", rename_all = "camelCase")]
    DiceRoll {
        #[serde(default)]
        event_id: Option<String>,
        player_id: String,
        roll_value: i64,
    },
    #[serde(rename = "report.submit", rename_all = "camelCase")]
    ReportSubmit {
        #[serde(default)]
        event_id: Option<String>,
        player_id: String,
        report_text: String,
        plan_number: i64,
    },
    #[serde(rename = "player.init", rename_all = "camelCase")]
    PlayerInit {
        player_id: String,
        #[serde(default)]
        email: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollEvent {
    pub event_id: String,
    pub player_id: PlayerId,
    pub roll: RollValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSubmission {
    pub event_id: String,
    pub player_id: PlayerId,
    pub plan_number: i32,
    pub report_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInit {
    pub player_id: PlayerId,
    pub email: Option<String>,
}

/// A validated inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Roll(RollEvent),
    Report(ReportSubmission),
    Init(PlayerInit),
}

impl Command {
    pub fn player_id(&self) -> &PlayerId {
        match self {
            Command::Roll(e) => &e.player_id,
            Command::Report(r) => &r.player_id,
            Command::Init(i) => &i.player_id,
        }
    }
}

fn player_id(raw: String) -> Result<PlayerId, AppError> {
    Ok(PlayerId::parse(raw)?)
}

/// Caller-supplied idempotency key, or a fresh ULID when absent.
fn event_id(raw: Option<String>) -> Result<String, AppError> {
    let Some(raw) = raw else {
        return Ok(ulid::Ulid::new().to_string());
    };
    if raw.is_empty() || raw.len() > MAX_EVENT_ID_LEN {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("eventId must be 1-{MAX_EVENT_ID_LEN} characters"),
        ));
    }
    if !regex_is_match!(r"^[A-Za-z0-9_.:-]+$", &raw) {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "eventId may only contain letters, digits, '_', '.', ':' or '-'",
        ));
    }
    Ok(raw)
}

fn roll(raw: i64) -> Result<RollValue, AppError> {
    let value = i32::try_from(raw).map_err(|_| {
        AppError::invalid(
            ErrorCode::InvalidRoll,
            format!("roll must be between 1 and 6, got {raw}"),
        )
    })?;
    Ok(RollValue::new(value)?)
}

fn plan_number(raw: i64) -> Result<i32, AppError> {
    i32::try_from(raw)
        .ok()
        .filter(|n| (1..=TOTAL_CELLS).contains(n))
        .ok_or_else(|| {
            AppError::invalid(
                ErrorCode::InvalidReport,
                format!("planNumber must be between 1 and {TOTAL_CELLS}, got {raw}"),
            )
        })
}

fn report_text(raw: String) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidReport,
            "reportText must not be empty",
        ));
    }
    if trimmed.chars().count() > MAX_REPORT_CHARS {
        return Err(AppError::invalid(
            ErrorCode::InvalidReport,
            format!("reportText must be at most {MAX_REPORT_CHARS} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn email(raw: Option<String>) -> Result<Option<String>, AppError> {
    let Some(raw) = raw.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };
    if raw.len() > MAX_EMAIL_LEN || !regex_is_match!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", &raw) {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "email is not a valid address",
        ));
    }
    Ok(Some(raw))
}

impl InboundEvent {
    pub fn validate(self) -> Result<Command, AppError> {
        match self {
            InboundEvent::DiceRoll {
                event_id: id,
                player_id: pid,
                roll_value,
            } => Ok(Command::Roll(RollEvent {
                player_id: player_id(pid)?,
                roll: roll(roll_value)?,
                event_id: event_id(id)?,
            })),
            InboundEvent::ReportSubmit {
                event_id: id,
                player_id: pid,
                report_text: text,
                plan_number: plan,
            } => Ok(Command::Report(ReportSubmission {
                player_id: player_id(pid)?,
                plan_number: plan_number(plan)?,
                report_text: report_text(text)?,
                event_id: event_id(id)?,
            })),
            InboundEvent::PlayerInit {
                player_id: pid,
                email: mail,
            } => Ok(Command::Init(PlayerInit {
                player_id: player_id(pid)?,
                email: email(mail)?,
            })),
        }
    }
}
