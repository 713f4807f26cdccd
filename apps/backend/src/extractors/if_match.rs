use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::http::etag::parse_version_from_etag;

/// Lock version from an optional `If-Match` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfMatch(pub Option<i32>);

fn parse(req: &HttpRequest) -> Result<IfMatch, AppError> {
    match req.headers().get(header::IF_MATCH) {
        None => Ok(IfMatch(None)),
        Some(value) => {
            let raw = value.to_str().map_err(|_| {
                AppError::bad_request(
                    crate::errors::ErrorCode::InvalidHeader,
                    "If-Match is not valid ASCII",
                )
            })?;
            parse_version_from_etag(raw).map(|v| IfMatch(Some(v)))
        }
    }
}

impl FromRequest for IfMatch {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse(req))
    }
}
