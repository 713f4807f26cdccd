//! ETag helpers for optimistic concurrency control.
//!
//! A session's ETag carries its `lock_version`, so clients can act with
//! `If-Match` instead of repeating the version in the body.

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Format: `"s{id}-v{version}"` (quoted, as HTTP requires).
///
/// ```
/// # use kinquest_backend::http::etag::session_etag;
/// assert_eq!(session_etag(12, 3), r#""s12-v3""#);
/// ```
pub fn session_etag(id: i64, version: i32) -> String {
    format!(r#""s{id}-v{version}""#)
}

/// Extract the lock version from a session ETag; weak validators are accepted.
pub fn parse_version_from_etag(raw: &str) -> Result<i32, AppError> {
    let s = raw.trim();
    let s = s.strip_prefix("W/").unwrap_or(s).trim_matches('"');

    let marker = s.rfind("-v").ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag: expected \"s{{id}}-v{{version}}\", got \"{s}\""),
        )
    })?;

    let version_str = &s[marker + 2..];
    version_str.parse::<i32>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag: version must be an integer, got \"{version_str}\""),
        )
    })
}
