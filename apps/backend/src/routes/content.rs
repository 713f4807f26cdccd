use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::CurrentProfile;
use crate::state::app_state::AppState;

/// GET /api/content/charade. Never fails once authenticated.
async fn charade(
    _current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.content.charade().await))
}

/// GET /api/content/challenge
async fn challenge(
    _current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.content.challenge().await))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/charade", web::get().to(charade))
        .route("/challenge", web::get().to(challenge));
}
