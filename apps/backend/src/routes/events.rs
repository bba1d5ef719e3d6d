use actix_web::{web, HttpResponse};
use tracing::info;

use crate::error::AppError;
use crate::events::InboundEvent;
use crate::extractors::ValidatedJson;
use crate::state::app_state::AppState;

/// Accept any inbound event and run its workflow to completion.
async fn post_event(
    app_state: web::Data<AppState>,
    body: ValidatedJson<InboundEvent>,
) -> Result<HttpResponse, AppError> {
    let command = body.into_inner().validate()?;
    let outcome = app_state.runner.handle(command).await?;
    info!(
        kind = %outcome.kind,
        player_id = %outcome.state.id,
        replayed = outcome.replayed,
        changed = outcome.changed,
        "event handled"
    );
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(post_event));
}
