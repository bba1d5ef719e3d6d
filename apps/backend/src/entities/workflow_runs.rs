use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_runs")]
pub struct Model {
    /// Inbound event id; the idempotency key of the run.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    #[sea_orm(column_name = "player_id")]
    pub player_id: String,
    /// Current state, `FAILED` included.
    pub state: String,
    /// Last step that finished successfully.
    pub completed: String,
    pub attempts: i32,
    #[sea_orm(column_type = "Text")]
    pub checkpoint: String,
    #[sea_orm(column_name = "last_error", column_type = "Text", nullable)]
    pub last_error: Option<String>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
