//! SeaORM adapter for report entries - generic over ConnectionTrait.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::report_entries;

/// Insert keyed by event id; a redelivered event is a no-op. Returns whether
/// a row was created.
pub async fn insert_once<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: &str,
    player_id: &str,
    plan_number: i32,
    report_text: &str,
) -> Result<bool, sea_orm::DbErr> {
    let active = report_entries::ActiveModel {
        event_id: Set(event_id.to_string()),
        player_id: Set(player_id.to_string()),
        plan_number: Set(plan_number),
        report_text: Set(report_text.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    let rows = report_entries::Entity::insert(active)
        .on_conflict(
            OnConflict::column(report_entries::Column::EventId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(rows > 0)
}

pub async fn find_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
) -> Result<Vec<report_entries::Model>, sea_orm::DbErr> {
    report_entries::Entity::find()
        .filter(report_entries::Column::PlayerId.eq(player_id))
        .order_by_asc(report_entries::Column::CreatedAt)
        .order_by_asc(report_entries::Column::EventId)
        .all(conn)
        .await
}
