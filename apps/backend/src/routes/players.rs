use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::domain::state::{PlayerId, PlayerState};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::ReportEntry;
use crate::state::app_state::AppState;

/// Public view of a player. The email stays server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateResponse {
    pub id: String,
    pub position: i32,
    pub previous_position: i32,
    pub consecutive_sixes: i32,
    pub position_before_streak: i32,
    pub is_finished: bool,
    pub needs_report: bool,
    pub message: Option<String>,
    pub version: i32,
}

impl From<PlayerState> for PlayerStateResponse {
    fn from(s: PlayerState) -> Self {
        Self {
            id: s.id.to_string(),
            position: s.position,
            previous_position: s.previous_position,
            consecutive_sixes: s.consecutive_sixes,
            position_before_streak: s.position_before_streak,
            is_finished: s.is_finished,
            needs_report: s.needs_report,
            message: s.message,
            version: s.version,
        }
    }
}

async fn get_player(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = PlayerId::parse(path.into_inner())?;
    let state = app_state
        .players
        .load_player_state(&id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(ErrorCode::PlayerNotFound, format!("Player {id} not found"))
        })?;
    Ok(HttpResponse::Ok().json(PlayerStateResponse::from(state)))
}

async fn list_reports(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = PlayerId::parse(path.into_inner())?;
    let reports: Vec<ReportEntry> = app_state.reports.list_reports(&id).await?;
    Ok(HttpResponse::Ok().json(reports))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{player_id}", web::get().to(get_player))
        .route("/{player_id}/reports", web::get().to(list_reports));
}
