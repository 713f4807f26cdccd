use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::jwt::mint_access_token;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::ValidatedJson;
use crate::logging::pii::Redacted;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct DevTokenRequest {
    pub sub: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevTokenResponse {
    pub token: String,
    pub expires_in: i64,
}

/// POST /api/auth/dev-token
///
/// Mints a token for any subject. Disabled unless `KINQUEST_DEV_TOKENS` is set;
/// production sign-in is handled by the identity provider in front of us.
async fn dev_token(
    body: ValidatedJson<DevTokenRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if !app_state.config.dev_tokens {
        return Err(AppError::not_found(ErrorCode::NotFound, "Not found"));
    }

    let sub = body.sub.trim();
    if sub.is_empty() {
        return Err(AppError::invalid(ErrorCode::EmptyInput, "sub must not be empty"));
    }

    let token = mint_access_token(sub, SystemTime::now(), &app_state.security)?;
    info!(sub = %Redacted(sub), "Dev token issued");

    Ok(HttpResponse::Ok().json(DevTokenResponse {
        token,
        expires_in: app_state.security.token_ttl_secs,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dev-token", web::post().to(dev_token));
}
