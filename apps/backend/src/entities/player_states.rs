use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "player_states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub position: i32,
    #[sea_orm(column_name = "previous_position")]
    pub previous_position: i32,
    #[sea_orm(column_name = "is_finished")]
    pub is_finished: bool,
    #[sea_orm(column_name = "needs_report")]
    pub needs_report: bool,
    #[sea_orm(column_name = "consecutive_sixes")]
    pub consecutive_sixes: i32,
    #[sea_orm(column_name = "position_before_streak")]
    pub position_before_streak: i32,
    pub message: Option<String>,
    pub email: Option<String>,
    pub version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report_entries::Entity")]
    ReportEntries,
}

impl Related<super::report_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
