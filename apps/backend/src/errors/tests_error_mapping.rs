// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::domain::errors::RuleError;
use crate::domain::state::PlayerId;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::workflow::error::WorkflowError;
use crate::workflow::run::WorkflowState;
use crate::{AppError, ErrorCode};

fn player() -> PlayerId {
    PlayerId::parse("p-1").unwrap()
}

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("bad field").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::OptimisticLock, "stale").into();
    assert_eq!(app.code().as_str(), "OPTIMISTIC_LOCK");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::conflict(ConflictKind::EventIdReused, "reused").into();
    assert_eq!(app.code().as_str(), "EVENT_ID_REUSED");

    let other = DomainError::conflict(ConflictKind::Other("x".into()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Player, "no player").into();
    assert_eq!(app.code().as_str(), "PLAYER_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad").into();
    assert_eq!(app.code().as_str(), "DATA_CORRUPTION");
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError = DomainError::infra(InfraErrorKind::Other("?".into()), "other").into();
    assert_eq!(app.code().as_str(), "DB_ERROR");
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn maps_rule_errors() {
    let app: AppError = RuleError::InvalidRoll(9).into();
    assert_eq!(app.code(), ErrorCode::InvalidRoll);
    assert_eq!(app.status().as_u16(), 400);

    let app: AppError = RuleError::ReportPending.into();
    assert_eq!(app.code(), ErrorCode::ReportRequired);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn report_required_is_a_distinct_conflict() {
    let app: AppError = WorkflowError::ReportRequired {
        player_id: player(),
    }
    .into();
    assert_eq!(app.code(), ErrorCode::ReportRequired);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn corruption_is_never_a_client_error() {
    let app: AppError = WorkflowError::Corrupt {
        player_id: player(),
        detail: "streak 4".into(),
    }
    .into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn exhausted_steps_map_by_cause() {
    let unavailable: AppError = WorkflowError::StepFailed {
        step: WorkflowState::Persisted,
        attempts: 5,
        source: DomainError::infra(InfraErrorKind::DbUnavailable, "down"),
    }
    .into();
    assert_eq!(unavailable.code(), ErrorCode::WorkflowFailed);
    assert_eq!(unavailable.status().as_u16(), 503);

    let publish: AppError = WorkflowError::StepFailed {
        step: WorkflowState::Notified,
        attempts: 5,
        source: DomainError::infra(InfraErrorKind::Publish, "redis"),
    }
    .into();
    assert_eq!(publish.code(), ErrorCode::WorkflowFailed);
    assert_eq!(publish.status().as_u16(), 500);
}

#[test]
fn stale_write_surfaces_as_optimistic_lock() {
    let app: AppError =
        WorkflowError::Conflict(DomainError::conflict(ConflictKind::OptimisticLock, "v1 != v2"))
            .into();
    assert_eq!(app.code(), ErrorCode::OptimisticLock);
    assert_eq!(app.status().as_u16(), 409);
}
