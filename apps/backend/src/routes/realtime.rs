use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{AuthToken, SessionId};
use crate::repos::profiles as profiles_repo;
use crate::services::sessions::SessionService;
use crate::state::app_state::AppState;
use crate::ws::session::WsSession;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// GET /api/ws/sessions/{session_id}?token=<jwt>
///
/// Browsers cannot set headers on a websocket handshake, so the token may
/// come in the query string; a bearer header is accepted too. Membership is
/// checked before the upgrade.
async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    session_id: SessionId,
    query: web::Query<WsQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = match query.into_inner().token {
        Some(t) if !t.is_empty() => t,
        _ => AuthToken::from_header(&req)?.token,
    };
    let claims = verify_access_token(&token, &app_state.security)?;

    let profile = profiles_repo::find_by_user_key(&app_state.db, &claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::forbidden(ErrorCode::ForbiddenProfileNotFound, "No profile for this account")
        })?;

    SessionService::default()
        .get_session(&app_state.db, session_id.0, profile.id)
        .await?;

    let actor = WsSession::new(session_id.0, profile.id, app_state.clone());
    ws::start(actor, &req, stream).map_err(|e| {
        AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Websocket handshake failed: {e}"),
        )
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sessions/{session_id}", web::get().to(upgrade));
}
