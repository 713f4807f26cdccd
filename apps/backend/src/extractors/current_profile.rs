use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use super::jwt::AuthClaims;
use crate::entities::profiles;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::profiles as profiles_repo;
use crate::state::app_state::AppState;

/// The caller's profile, resolved from the token subject.
///
/// The acting participant of every session or mission operation comes from
/// here, never from the request body.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub profiles::Model);

impl CurrentProfile {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

impl FromRequest for CurrentProfile {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = AuthClaims::from_request_sync(&req)?;
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            let profile = profiles_repo::find_by_user_key(&state.db, claims.sub())
                .await?
                .ok_or_else(|| {
                    AppError::forbidden(
                        ErrorCode::ForbiddenProfileNotFound,
                        "No profile for this account yet; call POST /api/profiles/me first",
                    )
                })?;

            Ok(CurrentProfile(profile))
        })
    }
}
