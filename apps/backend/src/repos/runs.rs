//! Workflow run records.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::adapters::workflow_runs_sea::{self as runs_adapter, RunRow};
use crate::domain::state::PlayerId;
use crate::entities::workflow_runs;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::workflow::run::{Checkpoint, WorkflowRun};

#[async_trait]
pub trait RunStore: Send + Sync {
    async fn load_run(&self, id: &str) -> Result<Option<WorkflowRun>, DomainError>;

    /// Insert or overwrite the record for `run.id`.
    async fn save_run(&self, run: &WorkflowRun) -> Result<(), DomainError>;
}

fn corrupt(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

impl TryFrom<&WorkflowRun> for RunRow {
    type Error = DomainError;

    fn try_from(run: &WorkflowRun) -> Result<Self, Self::Error> {
        let checkpoint = serde_json::to_string(&run.checkpoint).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("Serialize".into()),
                format!("checkpoint for run {}: {e}", run.id),
            )
        })?;
        Ok(Self {
            id: run.id.clone(),
            kind: run.kind.as_str().to_string(),
            player_id: run.player_id.to_string(),
            state: run.state.as_str().to_string(),
            completed: run.completed.as_str().to_string(),
            attempts: i32::try_from(run.attempts).unwrap_or(i32::MAX),
            checkpoint,
            last_error: run.last_error.clone(),
        })
    }
}

impl TryFrom<workflow_runs::Model> for WorkflowRun {
    type Error = DomainError;

    fn try_from(m: workflow_runs::Model) -> Result<Self, Self::Error> {
        let checkpoint: Checkpoint = serde_json::from_str(&m.checkpoint)
            .map_err(|e| corrupt(format!("run {} checkpoint: {e}", m.id)))?;
        Ok(Self {
            kind: m.kind.parse().map_err(corrupt)?,
            player_id: PlayerId::parse(m.player_id)
                .map_err(|e| corrupt(format!("run {}: {e}", m.id)))?,
            state: m.state.parse().map_err(corrupt)?,
            completed: m.completed.parse().map_err(corrupt)?,
            attempts: u32::try_from(m.attempts).unwrap_or(0),
            checkpoint,
            last_error: m.last_error,
            id: m.id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SeaRunStore {
    db: DatabaseConnection,
}

impl SeaRunStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RunStore for SeaRunStore {
    async fn load_run(&self, id: &str) -> Result<Option<WorkflowRun>, DomainError> {
        runs_adapter::find_by_id(&self.db, id)
            .await?
            .map(WorkflowRun::try_from)
            .transpose()
    }

    async fn save_run(&self, run: &WorkflowRun) -> Result<(), DomainError> {
        let row = RunRow::try_from(run)?;
        Ok(runs_adapter::upsert(&self.db, row).await?)
    }
}
