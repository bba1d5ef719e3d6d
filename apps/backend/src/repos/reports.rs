//! Opaque report storage. The workflow only needs an idempotent write; reads
//! exist for operators and tests.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::adapters::report_entries_sea as reports_adapter;
use crate::domain::state::PlayerId;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub event_id: String,
    pub player_id: String,
    pub plan_number: i32,
    pub report_text: String,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Store `text` under `event_id`. Saving the same event id again is a
    /// no-op that still succeeds.
    async fn save_report_text(
        &self,
        event_id: &str,
        player_id: &PlayerId,
        plan_number: i32,
        text: &str,
    ) -> Result<(), DomainError>;

    async fn list_reports(&self, player_id: &PlayerId) -> Result<Vec<ReportEntry>, DomainError>;
}

#[derive(Debug, Clone)]
pub struct SeaReportStore {
    db: DatabaseConnection,
}

impl SeaReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportStore for SeaReportStore {
    async fn save_report_text(
        &self,
        event_id: &str,
        player_id: &PlayerId,
        plan_number: i32,
        text: &str,
    ) -> Result<(), DomainError> {
        let created =
            reports_adapter::insert_once(&self.db, event_id, player_id.as_str(), plan_number, text)
                .await?;
        if !created {
            tracing::debug!(event_id, player_id = %player_id, "report already stored");
        }
        Ok(())
    }

    async fn list_reports(&self, player_id: &PlayerId) -> Result<Vec<ReportEntry>, DomainError> {
        let rows = reports_adapter::find_by_player(&self.db, player_id.as_str()).await?;
        Ok(rows
            .into_iter()
            .map(|m| ReportEntry {
                event_id: m.event_id,
                player_id: m.player_id,
                plan_number: m.plan_number,
                report_text: m.report_text,
            })
            .collect())
    }
}
