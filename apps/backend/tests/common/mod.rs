#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;

use backend_test_support::unique_helpers::{unique_event_id, unique_player_id};
use leela_backend::domain::state::{PlayerId, PlayerState, RollValue};
use leela_backend::events::{Command, PlayerInit, ReportSubmission, RollEvent};
use leela_backend::infra::memory::{
    FailurePlan, MemoryPlayerStore, MemoryPublisher, MemoryReportStore, MemoryRunStore,
};
use leela_backend::workflow::{RetryPolicy, WorkflowRunner};

pub mod proptest_prelude;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Runner wired to in-memory collaborators that share one failure plan.
pub struct Harness {
    pub faults: Arc<FailurePlan>,
    pub players: Arc<MemoryPlayerStore>,
    pub reports: Arc<MemoryReportStore>,
    pub runs: Arc<MemoryRunStore>,
    pub publisher: Arc<MemoryPublisher>,
    pub runner: WorkflowRunner,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::immediate(3))
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        let faults = FailurePlan::new();
        let players = Arc::new(MemoryPlayerStore::with_faults(faults.clone()));
        let reports = Arc::new(MemoryReportStore::with_faults(faults.clone()));
        let runs = Arc::new(MemoryRunStore::with_faults(faults.clone()));
        let publisher = Arc::new(MemoryPublisher::with_faults(faults.clone()));
        let runner = WorkflowRunner::new(
            players.clone(),
            reports.clone(),
            runs.clone(),
            publisher.clone(),
        )
        .with_policy(policy);
        Self {
            faults,
            players,
            reports,
            runs,
            publisher,
            runner,
        }
    }

    pub fn state(&self, id: &PlayerId) -> PlayerState {
        self.players.get(id).expect("player should exist")
    }
}

pub fn new_player() -> PlayerId {
    PlayerId::parse(unique_player_id()).expect("generated id is valid")
}

/// A player resting on `cell` with no streak and no pending report.
pub fn player_at(id: &PlayerId, cell: i32) -> PlayerState {
    PlayerState {
        position: cell,
        previous_position: cell,
        position_before_streak: cell,
        is_finished: false,
        ..PlayerState::awaiting_start(id.clone())
    }
}

pub fn roll(id: &PlayerId, value: i32) -> RollEvent {
    roll_with_id(id, value, &unique_event_id())
}

pub fn roll_with_id(id: &PlayerId, value: i32, event_id: &str) -> RollEvent {
    RollEvent {
        event_id: event_id.to_string(),
        player_id: id.clone(),
        roll: RollValue::new(value).expect("roll in range"),
    }
}

pub fn report(id: &PlayerId, plan_number: i32) -> ReportSubmission {
    report_with_id(id, plan_number, &unique_event_id())
}

pub fn report_with_id(id: &PlayerId, plan_number: i32, event_id: &str) -> ReportSubmission {
    ReportSubmission {
        event_id: event_id.to_string(),
        player_id: id.clone(),
        plan_number,
        report_text: format!("reflection on plan {plan_number}"),
    }
}

pub fn init(id: &PlayerId, email: Option<&str>) -> Command {
    Command::Init(PlayerInit {
        player_id: id.clone(),
        email: email.map(str::to_string),
    })
}
