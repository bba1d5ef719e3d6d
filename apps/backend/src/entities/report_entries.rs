use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "event_id")]
    pub event_id: String,
    #[sea_orm(column_name = "player_id")]
    pub player_id: String,
    #[sea_orm(column_name = "plan_number")]
    pub plan_number: i32,
    #[sea_orm(column_name = "report_text", column_type = "Text")]
    pub report_text: String,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::player_states::Entity",
        from = "Column::PlayerId",
        to = "super::player_states::Column::Id"
    )]
    PlayerState,
}

impl Related<super::player_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerState.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
