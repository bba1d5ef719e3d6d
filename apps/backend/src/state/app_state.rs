use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::events::BroadcastHub;
use crate::repos::{PlayerStore, ReportStore};
use crate::workflow::WorkflowRunner;

/// Shared resources handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Absent when the stores are in-process only.
    pub db: Option<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub runner: Arc<WorkflowRunner>,
    pub hub: Arc<BroadcastHub>,
    pub players: Arc<dyn PlayerStore>,
    pub reports: Arc<dyn ReportStore>,
}

impl AppState {
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
