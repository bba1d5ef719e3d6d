//! Player state persistence.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::adapters::player_states_sea::{self as players_adapter, PlayerStateRow};
use crate::domain::state::{PlayerId, PlayerState};
use crate::entities::player_states;
use crate::errors::domain::{DomainError, InfraErrorKind};

#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn load_player_state(&self, id: &PlayerId) -> Result<Option<PlayerState>, DomainError>;

    /// Create the row if no state exists for `state.id`. Returns whether it
    /// was created; an existing row is left untouched.
    async fn insert_if_absent(&self, state: &PlayerState) -> Result<bool, DomainError>;

    /// Replace the stored state with `next` iff the stored version is still
    /// `expected_version`. A mismatch is `Conflict(OptimisticLock)`.
    async fn save_player_state(
        &self,
        next: &PlayerState,
        expected_version: i32,
    ) -> Result<(), DomainError>;
}

impl From<&PlayerState> for PlayerStateRow {
    fn from(s: &PlayerState) -> Self {
        Self {
            id: s.id.to_string(),
            position: s.position,
            previous_position: s.previous_position,
            is_finished: s.is_finished,
            needs_report: s.needs_report,
            consecutive_sixes: s.consecutive_sixes,
            position_before_streak: s.position_before_streak,
            message: s.message.clone(),
            email: s.email.clone(),
            version: s.version,
        }
    }
}

impl TryFrom<player_states::Model> for PlayerState {
    type Error = DomainError;

    /// Only the id is checked here; rule invariants are the workflow's call.
    fn try_from(m: player_states::Model) -> Result<Self, Self::Error> {
        let id = PlayerId::parse(m.id).map_err(|e| {
            DomainError::infra(InfraErrorKind::DataCorruption, format!("stored {e}"))
        })?;
        Ok(Self {
            id,
            position: m.position,
            previous_position: m.previous_position,
            consecutive_sixes: m.consecutive_sixes,
            position_before_streak: m.position_before_streak,
            is_finished: m.is_finished,
            needs_report: m.needs_report,
            message: m.message,
            email: m.email,
            version: m.version,
        })
    }
}

/// SeaORM implementation of PlayerStore.
#[derive(Debug, Clone)]
pub struct SeaPlayerStore {
    db: DatabaseConnection,
}

impl SeaPlayerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlayerStore for SeaPlayerStore {
    async fn load_player_state(&self, id: &PlayerId) -> Result<Option<PlayerState>, DomainError> {
        players_adapter::find_by_id(&self.db, id.as_str())
            .await?
            .map(PlayerState::try_from)
            .transpose()
    }

    async fn insert_if_absent(&self, state: &PlayerState) -> Result<bool, DomainError> {
        Ok(players_adapter::insert_if_absent(&self.db, state.into()).await?)
    }

    async fn save_player_state(
        &self,
        next: &PlayerState,
        expected_version: i32,
    ) -> Result<(), DomainError> {
        Ok(players_adapter::update_guarded(&self.db, next.into(), expected_version).await?)
    }
}
