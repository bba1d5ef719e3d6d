//! In-process store and publisher implementations.
//!
//! Used by workflow tests and by anything that wants the runner without a
//! database. A shared [`FailurePlan`] lets callers queue faults per
//! operation: an error before the call, a stall, or an error reported after
//! the write already happened.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::state::{PlayerId, PlayerState};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::events::outbound::OutboundEvent;
use crate::events::publisher::EventPublisher;
use crate::repos::{PlayerStore, ReportEntry, ReportStore, RunStore};
use crate::workflow::run::WorkflowRun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    LoadPlayer,
    InsertPlayer,
    SavePlayer,
    SaveReport,
    LoadRun,
    SaveRun,
    Publish,
}

#[derive(Debug)]
pub enum Fault {
    /// Let the call through untouched; used to target a later call.
    Pass,
    /// Fail without touching state.
    Fail(DomainError),
    /// Sleep before doing the work.
    Stall(Duration),
    /// Do the work, then report failure.
    FailAfterWrite(DomainError),
}

#[derive(Debug, Default)]
pub struct FailurePlan {
    queued: Mutex<HashMap<Op, VecDeque<Fault>>>,
    calls: Mutex<HashMap<Op, usize>>,
}

impl FailurePlan {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue `fault` for the next unfaulted call of `op`.
    pub fn inject(&self, op: Op, fault: Fault) {
        self.queued.lock().entry(op).or_default().push_back(fault);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    /// Count the call and apply any queued fault. `Ok(Some(err))` means the
    /// caller should do the work and then return `err`.
    async fn enter(&self, op: Op) -> Result<Option<DomainError>, DomainError> {
        *self.calls.lock().entry(op).or_default() += 1;
        let fault = self.queued.lock().get_mut(&op).and_then(VecDeque::pop_front);
        match fault {
            None | Some(Fault::Pass) => Ok(None),
            Some(Fault::Fail(err)) => Err(err),
            Some(Fault::Stall(d)) => {
                tokio::time::sleep(d).await;
                Ok(None)
            }
            Some(Fault::FailAfterWrite(err)) => Ok(Some(err)),
        }
    }
}

fn settle<T>(value: T, after: Option<DomainError>) -> Result<T, DomainError> {
    match after {
        Some(err) => Err(err),
        None => Ok(value),
    }
}

#[derive(Debug, Default)]
pub struct MemoryPlayerStore {
    states: Mutex<HashMap<PlayerId, PlayerState>>,
    faults: Arc<FailurePlan>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Arc<FailurePlan>) -> Self {
        Self {
            states: Mutex::default(),
            faults,
        }
    }

    /// Overwrite the stored state, bypassing the version guard.
    pub fn put(&self, state: PlayerState) {
        self.states.lock().insert(state.id.clone(), state);
    }

    pub fn get(&self, id: &PlayerId) -> Option<PlayerState> {
        self.states.lock().get(id).cloned()
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn load_player_state(&self, id: &PlayerId) -> Result<Option<PlayerState>, DomainError> {
        let after = self.faults.enter(Op::LoadPlayer).await?;
        settle(self.get(id), after)
    }

    async fn insert_if_absent(&self, state: &PlayerState) -> Result<bool, DomainError> {
        let after = self.faults.enter(Op::InsertPlayer).await?;
        let created = {
            let mut states = self.states.lock();
            if states.contains_key(&state.id) {
                false
            } else {
                states.insert(state.id.clone(), state.clone());
                true
            }
        };
        settle(created, after)
    }

    async fn save_player_state(
        &self,
        next: &PlayerState,
        expected_version: i32,
    ) -> Result<(), DomainError> {
        let after = self.faults.enter(Op::SavePlayer).await?;
        {
            let mut states = self.states.lock();
            let Some(current) = states.get_mut(&next.id) else {
                return Err(DomainError::not_found(
                    NotFoundKind::Player,
                    format!("Player {} not found", next.id),
                ));
            };
            if current.version != expected_version {
                return Err(DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "Player state was modified concurrently (expected version {expected_version}, actual version {})",
                        current.version
                    ),
                ));
            }
            *current = next.clone();
        }
        settle((), after)
    }
}

#[derive(Debug, Default)]
pub struct MemoryReportStore {
    entries: Mutex<Vec<ReportEntry>>,
    faults: Arc<FailurePlan>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Arc<FailurePlan>) -> Self {
        Self {
            entries: Mutex::default(),
            faults,
        }
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn save_report_text(
        &self,
        event_id: &str,
        player_id: &PlayerId,
        plan_number: i32,
        text: &str,
    ) -> Result<(), DomainError> {
        let after = self.faults.enter(Op::SaveReport).await?;
        {
            let mut entries = self.entries.lock();
            if !entries.iter().any(|e| e.event_id == event_id) {
                entries.push(ReportEntry {
                    event_id: event_id.to_string(),
                    player_id: player_id.to_string(),
                    plan_number,
                    report_text: text.to_string(),
                });
            }
        }
        settle((), after)
    }

    async fn list_reports(&self, player_id: &PlayerId) -> Result<Vec<ReportEntry>, DomainError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|e| e.player_id == player_id.as_str())
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryRunStore {
    runs: Mutex<HashMap<String, WorkflowRun>>,
    faults: Arc<FailurePlan>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Arc<FailurePlan>) -> Self {
        Self {
            runs: Mutex::default(),
            faults,
        }
    }

    pub fn get(&self, id: &str) -> Option<WorkflowRun> {
        self.runs.lock().get(id).cloned()
    }

    pub fn put(&self, run: WorkflowRun) {
        self.runs.lock().insert(run.id.clone(), run);
    }
}

#[async_trait]
impl RunStore for MemoryRunStore {
    async fn load_run(&self, id: &str) -> Result<Option<WorkflowRun>, DomainError> {
        let after = self.faults.enter(Op::LoadRun).await?;
        settle(self.get(id), after)
    }

    async fn save_run(&self, run: &WorkflowRun) -> Result<(), DomainError> {
        let after = self.faults.enter(Op::SaveRun).await?;
        self.put(run.clone());
        settle((), after)
    }
}

/// Records every published event in order.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    events: Mutex<Vec<OutboundEvent>>,
    faults: Arc<FailurePlan>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Arc<FailurePlan>) -> Self {
        Self {
            events: Mutex::default(),
            faults,
        }
    }

    pub fn events(&self) -> Vec<OutboundEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, event: &OutboundEvent) -> Result<(), DomainError> {
        let after = self.faults.enter(Op::Publish).await?;
        self.events.lock().push(event.clone());
        settle((), after)
    }
}
