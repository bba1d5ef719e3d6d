//! SeaORM adapter for player state rows - generic over ConnectionTrait.
//!
//! Adapter functions return DbErr; the repos layer maps to DomainError.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::player_states;
use crate::infra::db_errors::{OPTIMISTIC_LOCK_PREFIX, PLAYER_NOT_FOUND_PREFIX};

/// Column values for an insert or a guarded update.
#[derive(Debug, Clone)]
pub struct PlayerStateRow {
    pub id: String,
    pub position: i32,
    pub previous_position: i32,
    pub is_finished: bool,
    pub needs_report: bool,
    pub consecutive_sixes: i32,
    pub position_before_streak: i32,
    pub message: Option<String>,
    pub email: Option<String>,
    pub version: i32,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<Option<player_states::Model>, sea_orm::DbErr> {
    player_states::Entity::find_by_id(id.to_string()).one(conn).await
}

/// Insert the row unless one with the same id exists. Returns whether a row
/// was created.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    row: PlayerStateRow,
) -> Result<bool, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = player_states::ActiveModel {
        id: Set(row.id),
        position: Set(row.position),
        previous_position: Set(row.previous_position),
        is_finished: Set(row.is_finished),
        needs_report: Set(row.needs_report),
        consecutive_sixes: Set(row.consecutive_sixes),
        position_before_streak: Set(row.position_before_streak),
        message: Set(row.message),
        email: Set(row.email),
        version: Set(row.version),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let rows = player_states::Entity::insert(active)
        .on_conflict(
            OnConflict::column(player_states::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(rows > 0)
}

/// Overwrite the game fields of `row.id` iff its stored version is
/// `expected_version`; the stored version becomes `row.version`.
///
/// Fails with a structured `OPTIMISTIC_LOCK:` error on a version mismatch and
/// `PLAYER_NOT_FOUND:` when the row is missing.
pub async fn update_guarded<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    row: PlayerStateRow,
    expected_version: i32,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let id = row.id.clone();

    let result = player_states::Entity::update_many()
        .col_expr(player_states::Column::Position, Expr::value(row.position))
        .col_expr(
            player_states::Column::PreviousPosition,
            Expr::value(row.previous_position),
        )
        .col_expr(player_states::Column::IsFinished, Expr::value(row.is_finished))
        .col_expr(player_states::Column::NeedsReport, Expr::value(row.needs_report))
        .col_expr(
            player_states::Column::ConsecutiveSixes,
            Expr::value(row.consecutive_sixes),
        )
        .col_expr(
            player_states::Column::PositionBeforeStreak,
            Expr::value(row.position_before_streak),
        )
        .col_expr(player_states::Column::Message, Expr::value(row.message))
        .col_expr(player_states::Column::Version, Expr::value(row.version))
        .col_expr(player_states::Column::UpdatedAt, Expr::value(now))
        .filter(player_states::Column::Id.eq(id.as_str()))
        .filter(player_states::Column::Version.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, &id).await? {
            Some(current) => Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
                expected_version, current.version
            ))),
            None => Err(sea_orm::DbErr::Custom(format!("{PLAYER_NOT_FOUND_PREFIX}{id}"))),
        };
    }
    Ok(())
}
