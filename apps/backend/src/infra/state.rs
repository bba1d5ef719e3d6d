use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::events::{BroadcastHub, EventPublisher, FanoutPublisher, RedisPublisher};
use crate::infra::db::bootstrap_db;
use crate::infra::memory::{MemoryPlayerStore, MemoryReportStore, MemoryRunStore};
use crate::repos::{
    PlayerStore, ReportStore, RunStore, SeaPlayerStore, SeaReportStore, SeaRunStore,
};
use crate::state::app_state::AppState;
use crate::workflow::{RetryPolicy, WorkflowRunner};

/// Builder for AppState, shared by `main` and tests.
pub struct StateBuilder {
    config: AppConfig,
    in_memory: bool,
    policy: Option<RetryPolicy>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            in_memory: false,
            policy: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Skip the database entirely and keep all state in process.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let hub = Arc::new(BroadcastHub::new());
        let mut sinks: Vec<Arc<dyn EventPublisher>> = Vec::new();
        sinks.push(hub.clone());
        if let Some(url) = &self.config.redis_url {
            sinks.push(Arc::new(RedisPublisher::connect(url).await?));
            info!("publishing notifications to redis");
        }
        let publisher: Arc<dyn EventPublisher> = if sinks.len() == 1 {
            hub.clone()
        } else {
            Arc::new(FanoutPublisher::new(sinks))
        };

        let (db, players, reports, runs): (
            _,
            Arc<dyn PlayerStore>,
            Arc<dyn ReportStore>,
            Arc<dyn RunStore>,
        ) = if self.in_memory {
            (
                None,
                Arc::new(MemoryPlayerStore::new()),
                Arc::new(MemoryReportStore::new()),
                Arc::new(MemoryRunStore::new()),
            )
        } else {
            // single entrypoint: connect + migrate
            let conn = bootstrap_db(&self.config.db).await?;
            (
                Some(conn.clone()),
                Arc::new(SeaPlayerStore::new(conn.clone())),
                Arc::new(SeaReportStore::new(conn.clone())),
                Arc::new(SeaRunStore::new(conn)),
            )
        };

        let policy = self
            .policy
            .unwrap_or_else(|| RetryPolicy::from_config(&self.config.workflow));
        let runner = WorkflowRunner::new(players.clone(), reports.clone(), runs, publisher)
            .with_policy(policy);

        Ok(AppState {
            db,
            config: Arc::new(self.config),
            runner: Arc::new(runner),
            hub,
            players,
            reports,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
