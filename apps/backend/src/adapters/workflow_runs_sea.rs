//! SeaORM adapter for workflow run records - generic over ConnectionTrait.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};

use crate::entities::workflow_runs;

#[derive(Debug, Clone)]
pub struct RunRow {
    pub id: String,
    pub kind: String,
    pub player_id: String,
    pub state: String,
    pub completed: String,
    pub attempts: i32,
    pub checkpoint: String,
    pub last_error: Option<String>,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<Option<workflow_runs::Model>, sea_orm::DbErr> {
    workflow_runs::Entity::find_by_id(id.to_string()).one(conn).await
}

/// Insert or overwrite the mutable columns of a run.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    row: RunRow,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = workflow_runs::ActiveModel {
        id: Set(row.id),
        kind: Set(row.kind),
        player_id: Set(row.player_id),
        state: Set(row.state),
        completed: Set(row.completed),
        attempts: Set(row.attempts),
        checkpoint: Set(row.checkpoint),
        last_error: Set(row.last_error),
        created_at: Set(now),
        updated_at: Set(now),
    };

    workflow_runs::Entity::insert(active)
        .on_conflict(
            OnConflict::column(workflow_runs::Column::Id)
                .update_columns([
                    workflow_runs::Column::State,
                    workflow_runs::Column::Completed,
                    workflow_runs::Column::Attempts,
                    workflow_runs::Column::Checkpoint,
                    workflow_runs::Column::LastError,
                    workflow_runs::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
