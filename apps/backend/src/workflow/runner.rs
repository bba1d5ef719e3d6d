//! Durable workflow runner: bridges pure game rules with persistence and
//! notification.
//!
//! Every roll and report is one run keyed by its event id. After each
//! completed step the run record is saved, so a redelivered event is either
//! answered from the finished record, resumed from its last completed step
//! once the state write may have been attempted, or restarted from scratch
//! when it never got that far. Each step is retried on its own according to
//! the [`RetryPolicy`].

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::board::Board;
use crate::domain::errors::RuleError;
use crate::domain::moves::apply_roll;
use crate::domain::narrative::{NarrativeGenerator, PlainNarrator};
use crate::domain::state::{PlayerId, PlayerState};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::events::inbound::{Command, PlayerInit, ReportSubmission, RollEvent};
use crate::events::outbound::{OutboundEvent, UpdatedFields};
use crate::events::publisher::EventPublisher;
use crate::logging::pii::{Redacted, Withheld};
use crate::repos::{PlayerStore, ReportStore, RunStore};
use crate::workflow::error::WorkflowError;
use crate::workflow::locks::PlayerLocks;
use crate::workflow::retry::{Attempted, RetryPolicy};
use crate::workflow::run::{WorkflowKind, WorkflowOutcome, WorkflowRun, WorkflowState};

/// Either a finished run to replay or a run to drive forward.
enum Opened {
    Replay(WorkflowOutcome),
    Drive(WorkflowRun),
}

pub struct WorkflowRunner {
    board: Board,
    players: Arc<dyn PlayerStore>,
    reports: Arc<dyn ReportStore>,
    runs: Arc<dyn RunStore>,
    publisher: Arc<dyn EventPublisher>,
    narrator: Arc<dyn NarrativeGenerator>,
    locks: PlayerLocks,
    policy: RetryPolicy,
}

impl WorkflowRunner {
    pub fn new(
        players: Arc<dyn PlayerStore>,
        reports: Arc<dyn ReportStore>,
        runs: Arc<dyn RunStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            board: Board::standard(),
            players,
            reports,
            runs,
            publisher,
            narrator: Arc::new(PlainNarrator),
            locks: PlayerLocks::new(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        self.narrator = narrator;
        self
    }

    /// Play on a custom layout. Tables that break the board's structural
    /// rules are rejected.
    pub fn with_board(mut self, board: Board) -> Result<Self, RuleError> {
        board.validate()?;
        self.board = board;
        Ok(self)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn handle(&self, command: Command) -> Result<WorkflowOutcome, WorkflowError> {
        match command {
            Command::Roll(ev) => self.handle_roll_event(ev).await,
            Command::Report(sub) => self.handle_report_submit(sub).await,
            Command::Init(init) => self.handle_player_init(init).await,
        }
    }

    pub async fn handle_roll_event(&self, ev: RollEvent) -> Result<WorkflowOutcome, WorkflowError> {
        let span = info_span!(
            "workflow",
            kind = "roll",
            workflow_id = %ev.event_id,
            player_id = %ev.player_id,
        );
        async {
            let guard = self.locks.lock(&ev.player_id).await;
            let res = self.drive_roll(&ev).await;
            drop(guard);
            self.locks.prune();
            res
        }
        .instrument(span)
        .await
    }

    pub async fn handle_report_submit(
        &self,
        sub: ReportSubmission,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let span = info_span!(
            "workflow",
            kind = "report",
            workflow_id = %sub.event_id,
            player_id = %sub.player_id,
        );
        async {
            let guard = self.locks.lock(&sub.player_id).await;
            let res = self.drive_report(&sub).await;
            drop(guard);
            self.locks.prune();
            res
        }
        .instrument(span)
        .await
    }

    /// Create the player's default state if absent. Emits a notification only
    /// when the row was created.
    pub async fn handle_player_init(
        &self,
        init: PlayerInit,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let span = info_span!("workflow", kind = "init", player_id = %init.player_id);
        async {
            let guard = self.locks.lock(&init.player_id).await;
            let res = self.drive_init(&init).await;
            drop(guard);
            self.locks.prune();
            res
        }
        .instrument(span)
        .await
    }

    async fn drive_roll(&self, ev: &RollEvent) -> Result<WorkflowOutcome, WorkflowError> {
        let id = &ev.player_id;
        let mut run = match self.open_run(&ev.event_id, WorkflowKind::Roll, id).await? {
            Opened::Replay(outcome) => return Ok(outcome),
            Opened::Drive(run) => run,
        };

        while let Some(step) = run.next_step() {
            match step {
                WorkflowState::StateLoaded => {
                    let loaded = self
                        .attempt(&mut run, step, |_| self.load_or_create(id))
                        .await?;
                    if let Err(e) = loaded.check_invariants() {
                        return Err(self.abort(&mut run, WorkflowError::from_rule(id, e)).await);
                    }
                    if loaded.needs_report {
                        let err = WorkflowError::ReportRequired {
                            player_id: id.clone(),
                        };
                        return Err(self.abort(&mut run, err).await);
                    }
                    run.checkpoint.loaded = Some(loaded);
                }
                WorkflowState::LogicApplied => {
                    let loaded = self.recorded(&mut run, step, |r| r.checkpoint.loaded.clone()).await?;
                    let result = match apply_roll(&self.board, &loaded, ev.roll) {
                        Ok(result) => result,
                        Err(e) => {
                            return Err(self.abort(&mut run, WorkflowError::from_rule(id, e)).await)
                        }
                    };
                    let message = self.narrator.narrate(&result.narrative_context);
                    debug!(
                        roll = ev.roll.get(),
                        from = result.previous_cell,
                        to = result.destination_cell,
                        transition = result.transition_kind.as_str(),
                        "roll applied"
                    );
                    run.checkpoint.next = Some(result.apply_to(&loaded, Some(message)));
                    run.checkpoint.move_result = Some(result);
                }
                WorkflowState::Persisted => {
                    let loaded = self.recorded(&mut run, step, |r| r.checkpoint.loaded.clone()).await?;
                    let next = self.recorded(&mut run, step, |r| r.checkpoint.next.clone()).await?;
                    self.attempt(&mut run, step, |_| self.persist(&next, loaded.version))
                        .await?;
                    run.checkpoint.changed = true;
                }
                WorkflowState::Notified => {
                    let next = self.recorded(&mut run, step, |r| r.checkpoint.next.clone()).await?;
                    let event = OutboundEvent::state_changed(id.clone(), UpdatedFields::full(&next));
                    self.attempt(&mut run, step, |_| self.publisher.publish(&event))
                        .await?;
                }
                _ => {}
            }
            self.complete(&mut run, step).await?;
        }

        self.finish(&run, false)
    }

    async fn drive_report(
        &self,
        sub: &ReportSubmission,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let id = &sub.player_id;
        let mut run = match self.open_run(&sub.event_id, WorkflowKind::Report, id).await? {
            Opened::Replay(outcome) => return Ok(outcome),
            Opened::Drive(run) => run,
        };

        while let Some(step) = run.next_step() {
            match step {
                WorkflowState::StateLoaded => {
                    let loaded = self
                        .attempt(&mut run, step, |_| self.players.load_player_state(id))
                        .await?;
                    let Some(loaded) = loaded else {
                        let err = WorkflowError::NotFound {
                            player_id: id.clone(),
                        };
                        return Err(self.abort(&mut run, err).await);
                    };
                    if let Err(e) = loaded.check_invariants() {
                        return Err(self.abort(&mut run, WorkflowError::from_rule(id, e)).await);
                    }
                    run.checkpoint.loaded = Some(loaded);
                }
                WorkflowState::ReportSaved => {
                    debug!(
                        plan_number = sub.plan_number,
                        report = %Withheld(&sub.report_text),
                        "saving report"
                    );
                    self.attempt(&mut run, step, |_| {
                        self.reports.save_report_text(
                            &sub.event_id,
                            id,
                            sub.plan_number,
                            &sub.report_text,
                        )
                    })
                    .await?;
                }
                WorkflowState::Persisted => {
                    let loaded = self.recorded(&mut run, step, |r| r.checkpoint.loaded.clone()).await?;
                    if loaded.needs_report {
                        let next = PlayerState {
                            needs_report: false,
                            version: loaded.version + 1,
                            ..loaded.clone()
                        };
                        self.attempt(&mut run, step, |_| self.persist(&next, loaded.version))
                            .await?;
                        run.checkpoint.next = Some(next);
                        run.checkpoint.changed = true;
                    } else {
                        debug!("no report was owed; state left unchanged");
                        run.checkpoint.next = Some(loaded);
                        run.checkpoint.changed = false;
                    }
                }
                WorkflowState::Notified if run.checkpoint.changed => {
                    let next = self.recorded(&mut run, step, |r| r.checkpoint.next.clone()).await?;
                    let event = OutboundEvent::state_changed(
                        id.clone(),
                        UpdatedFields::report_cleared(next.version),
                    );
                    self.attempt(&mut run, step, |_| self.publisher.publish(&event))
                        .await?;
                }
                _ => {}
            }
            self.complete(&mut run, step).await?;
        }

        self.finish(&run, false)
    }

    async fn drive_init(&self, init: &PlayerInit) -> Result<WorkflowOutcome, WorkflowError> {
        let id = &init.player_id;
        let fresh = PlayerState {
            email: init.email.clone(),
            ..PlayerState::awaiting_start(id.clone())
        };
        if let Some(email) = &init.email {
            debug!(email = %Redacted(email), "initializing player");
        }

        let Attempted { result, attempts } = self
            .policy
            .run(WorkflowState::Persisted, |_| self.players.insert_if_absent(&fresh))
            .await;
        let created = result.map_err(|e| step_error(id, WorkflowState::Persisted, attempts, e))?;

        let state = if created {
            let event = OutboundEvent::state_changed(id.clone(), UpdatedFields::full(&fresh));
            let Attempted { result, attempts } = self
                .policy
                .run(WorkflowState::Notified, |_| self.publisher.publish(&event))
                .await;
            result.map_err(|e| step_error(id, WorkflowState::Notified, attempts, e))?;
            info!("player created");
            fresh
        } else {
            let Attempted { result, attempts } = self
                .policy
                .run(WorkflowState::StateLoaded, |_| self.players.load_player_state(id))
                .await;
            result
                .map_err(|e| step_error(id, WorkflowState::StateLoaded, attempts, e))?
                .ok_or_else(|| WorkflowError::NotFound {
                    player_id: id.clone(),
                })?
        };

        Ok(WorkflowOutcome {
            event_id: None,
            kind: WorkflowKind::Init,
            state,
            move_result: None,
            changed: created,
            replayed: false,
        })
    }

    /// Look up the run for `event_id` and decide how to proceed.
    async fn open_run(
        &self,
        event_id: &str,
        kind: WorkflowKind,
        player_id: &PlayerId,
    ) -> Result<Opened, WorkflowError> {
        let Attempted { result, attempts } = self
            .policy
            .run(WorkflowState::Received, |_| self.runs.load_run(event_id))
            .await;
        let existing =
            result.map_err(|e| step_error(player_id, WorkflowState::Received, attempts, e))?;

        let Some(mut run) = existing else {
            let run = WorkflowRun::start(event_id, kind, player_id.clone());
            self.save(&run).await?;
            debug!("run started");
            return Ok(Opened::Drive(run));
        };

        if run.kind != kind || &run.player_id != player_id {
            warn!(
                recorded_kind = %run.kind,
                recorded_player = %run.player_id,
                "event id reused for a different event"
            );
            return Err(WorkflowError::Conflict(DomainError::conflict(
                ConflictKind::EventIdReused,
                format!("event id {event_id} was already used for a different event"),
            )));
        }

        if run.is_done() {
            info!("duplicate event; replaying recorded outcome");
            return self.finish(&run, true).map(Opened::Replay);
        }

        if run.is_committed() {
            info!(completed = %run.completed, "resuming run after committed write");
        } else if run.awaits_write() {
            info!(completed = %run.completed, "resuming run at the state write");
        } else {
            info!(completed = %run.completed, state = %run.state, "restarting uncommitted run");
            run.restart();
            self.save(&run).await?;
        }
        Ok(Opened::Drive(run))
    }

    /// Run one step under the retry policy. A failure marks the run FAILED.
    async fn attempt<T, F, Fut>(
        &self,
        run: &mut WorkflowRun,
        step: WorkflowState,
        op: F,
    ) -> Result<T, WorkflowError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let Attempted { result, attempts } = self.policy.run(step, op).await;
        run.attempts = run.attempts.saturating_add(attempts);
        match result {
            Ok(value) => Ok(value),
            Err(source) => {
                let err = step_error(&run.player_id, step, attempts, source);
                Err(self.abort(run, err).await)
            }
        }
    }

    /// A value an earlier step must have recorded. Missing means the stored
    /// run is unusable.
    async fn recorded<T>(
        &self,
        run: &mut WorkflowRun,
        step: WorkflowState,
        pick: impl FnOnce(&WorkflowRun) -> Option<T>,
    ) -> Result<T, WorkflowError> {
        match pick(&*run) {
            Some(value) => Ok(value),
            None => {
                let err = WorkflowError::Corrupt {
                    player_id: run.player_id.clone(),
                    detail: format!("run {} reached {step} without its recorded inputs", run.id),
                };
                Err(self.abort(run, err).await)
            }
        }
    }

    async fn complete(&self, run: &mut WorkflowRun, step: WorkflowState) -> Result<(), WorkflowError> {
        run.advance(step);
        self.save(run).await?;
        debug!(step = %step, attempts = run.attempts, "step completed");
        Ok(())
    }

    async fn save(&self, run: &WorkflowRun) -> Result<(), WorkflowError> {
        let Attempted { result, attempts } = self
            .policy
            .run(run.state, |_| self.runs.save_run(run))
            .await;
        result.map_err(|e| step_error(&run.player_id, run.state, attempts, e))
    }

    /// Mark the run FAILED and record it. Failing to record the failure is
    /// logged; the original error is what the caller sees.
    async fn abort(&self, run: &mut WorkflowRun, err: WorkflowError) -> WorkflowError {
        warn!(step = ?run.next_step(), error = %err, "workflow failed");
        run.fail(&err);
        if let Err(save_err) = self.save(run).await {
            warn!(error = %save_err, "could not record failed run");
        }
        err
    }

    fn finish(&self, run: &WorkflowRun, replayed: bool) -> Result<WorkflowOutcome, WorkflowError> {
        let state = run
            .checkpoint
            .next
            .clone()
            .ok_or_else(|| WorkflowError::Corrupt {
                player_id: run.player_id.clone(),
                detail: format!("finished run {} has no recorded state", run.id),
            })?;
        Ok(WorkflowOutcome {
            event_id: Some(run.id.clone()),
            kind: run.kind,
            state,
            move_result: run.checkpoint.move_result.clone(),
            changed: run.checkpoint.changed,
            replayed,
        })
    }

    /// Load the player, creating the dormant default on first contact.
    async fn load_or_create(&self, id: &PlayerId) -> Result<PlayerState, DomainError> {
        if let Some(state) = self.players.load_player_state(id).await? {
            return Ok(state);
        }
        if self
            .players
            .insert_if_absent(&PlayerState::awaiting_start(id.clone()))
            .await?
        {
            info!("created default state on first roll");
        }
        self.players.load_player_state(id).await?.ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::Other("PlayerVanished".into()),
                format!("state for {id} missing right after insert"),
            )
        })
    }

    /// Guarded write of `next`. When the guard trips, a stored state equal to
    /// `next` means an earlier attempt already landed.
    async fn persist(&self, next: &PlayerState, expected_version: i32) -> Result<(), DomainError> {
        match self.players.save_player_state(next, expected_version).await {
            Err(DomainError::Conflict(ConflictKind::OptimisticLock, detail)) => {
                let current = self.players.load_player_state(&next.id).await?;
                if current.as_ref() == Some(next) {
                    debug!(version = next.version, "write already applied");
                    Ok(())
                } else {
                    Err(DomainError::Conflict(ConflictKind::OptimisticLock, detail))
                }
            }
            other => other,
        }
    }
}

fn step_error(
    player_id: &PlayerId,
    step: WorkflowState,
    attempts: u32,
    source: DomainError,
) -> WorkflowError {
    match source {
        DomainError::Infra(InfraErrorKind::DataCorruption, detail) => WorkflowError::Corrupt {
            player_id: player_id.clone(),
            detail,
        },
        DomainError::NotFound(NotFoundKind::Player, _) => WorkflowError::NotFound {
            player_id: player_id.clone(),
        },
        conflict @ DomainError::Conflict(..) => WorkflowError::Conflict(conflict),
        source => WorkflowError::StepFailed {
            step,
            attempts,
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{NarrativeContext, RollValue};
    use crate::infra::memory::{MemoryPlayerStore, MemoryPublisher, MemoryReportStore, MemoryRunStore};

    struct Oracle;

    impl NarrativeGenerator for Oracle {
        fn narrate(&self, ctx: &NarrativeContext) -> String {
            format!("oracle: {} -> {}", ctx.previous_cell, ctx.current_cell)
        }
    }

    fn runner() -> WorkflowRunner {
        WorkflowRunner::new(
            Arc::new(MemoryPlayerStore::new()),
            Arc::new(MemoryReportStore::new()),
            Arc::new(MemoryRunStore::new()),
            Arc::new(MemoryPublisher::new()),
        )
        .with_policy(RetryPolicy::immediate(1))
    }

    fn roll(event_id: &str, value: i32) -> RollEvent {
        RollEvent {
            event_id: event_id.to_string(),
            player_id: PlayerId::parse("p1").unwrap(),
            roll: RollValue::new(value).unwrap(),
        }
    }

    #[tokio::test]
    async fn injected_narrator_writes_the_message() {
        let runner = runner().with_narrator(Arc::new(Oracle));

        let outcome = runner.handle_roll_event(roll("evt-1", 6)).await.unwrap();

        assert_eq!(outcome.state.message.as_deref(), Some("oracle: 68 -> 6"));
    }

    #[tokio::test]
    async fn custom_board_drives_resolution() {
        static SNAKES: &[(i32, i32)] = &[(8, 2)];
        let runner = runner()
            .with_board(Board::with_tables(SNAKES, &[]))
            .unwrap();

        runner.handle_roll_event(roll("evt-1", 6)).await.unwrap();
        let outcome = runner.handle_roll_event(roll("evt-2", 2)).await.unwrap();

        assert_eq!(outcome.state.position, 2);
    }

    #[test]
    fn malformed_board_is_rejected() {
        static ASCENDING_SNAKE: &[(i32, i32)] = &[(10, 20)];
        let err = runner()
            .with_board(Board::with_tables(ASCENDING_SNAKE, &[]))
            .err();
        assert!(matches!(err, Some(RuleError::InvalidBoard(_))));
    }
}
