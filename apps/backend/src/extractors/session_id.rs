use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Positive session id from the `{session_id}` path segment.
///
/// Existence and membership are checked by the service, inside the
/// transaction that uses the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub i64);

fn parse(req: &HttpRequest) -> Result<SessionId, AppError> {
    let raw = req.match_info().get("session_id").ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidSessionId, "Missing session_id parameter")
    })?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(SessionId(id)),
        _ => Err(AppError::bad_request(
            ErrorCode::InvalidSessionId,
            format!("Invalid session id: {raw}"),
        )),
    }
}

impl FromRequest for SessionId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse(req))
    }
}
