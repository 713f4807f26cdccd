//! SeaORM -> DomainError translation helpers.
//!
//! Adapters surface structured failures as `DbErr::Custom` payloads
//! (`OPTIMISTIC_LOCK:{json}`, `SESSION_NOT_FOUND:{id}`); everything else is
//! classified by SQLSTATE or driver message here.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";
pub const SESSION_NOT_FOUND_PREFIX: &str = "SESSION_NOT_FOUND:";
pub const MISSION_NOT_FOUND_PREFIX: &str = "MISSION_NOT_FOUND:";

/// Build the structured lock error adapters return when a conditional write affects no rows.
pub fn optimistic_lock_err(expected: i32, actual: i32) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!(
        "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{expected},\"actual\":{actual}}}"
    ))
}

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

fn is_unique_violation(msg: &str) -> bool {
    mentions_sqlstate(msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
}

/// Map a unique violation onto a domain conflict by index or `table.column`.
fn unique_conflict(msg: &str) -> DomainError {
    if msg.contains("ux_profiles_user_key") || msg.contains("profiles.user_key") {
        return DomainError::conflict(ConflictKind::UniqueProfile, "Profile already exists");
    }
    if msg.contains("ux_reward_grants_event_key") || msg.contains("reward_grants.event_key") {
        return DomainError::conflict(
            ConflictKind::Other("RewardAlreadyGranted".into()),
            "Reward already granted",
        );
    }
    DomainError::conflict(ConflictKind::Other("Unique".into()), "Unique constraint violation")
}

fn parse_prefixed_id(msg: &str, prefix: &str) -> Option<i64> {
    msg.strip_prefix(prefix)?.trim().parse().ok()
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(SESSION_NOT_FOUND_PREFIX) => {
            return match parse_prefixed_id(msg, SESSION_NOT_FOUND_PREFIX) {
                Some(session_id) => {
                    warn!(trace_id = %trace_id, session_id, "Session not found");
                    DomainError::not_found(
                        NotFoundKind::Session,
                        format!("Session {session_id} not found"),
                    )
                }
                None => DomainError::not_found(NotFoundKind::Session, "Session not found"),
            };
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(MISSION_NOT_FOUND_PREFIX) => {
            let detail = parse_prefixed_id(msg, MISSION_NOT_FOUND_PREFIX)
                .map(|id| format!("Mission {id} not found"))
                .unwrap_or_else(|| "Mission not found".to_string());
            return DomainError::not_found(NotFoundKind::Mission, detail);
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(OPTIMISTIC_LOCK_PREFIX) => {
            #[derive(serde::Deserialize)]
            struct LockInfo {
                expected: i32,
                actual: i32,
            }

            let parsed = msg
                .strip_prefix(OPTIMISTIC_LOCK_PREFIX)
                .and_then(|json| serde_json::from_str::<LockInfo>(json).ok());
            if let Some(info) = parsed {
                warn!(
                    trace_id = %trace_id,
                    expected = info.expected,
                    actual = info.actual,
                    "Optimistic lock conflict detected"
                );
                return DomainError::optimistic_lock(info.expected, info.actual);
            }

            warn!(trace_id = %trace_id, "Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Resource was modified by another transaction; please retry",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if is_unique_violation(&error_msg) {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        return unique_conflict(&error_msg);
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("pool timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(InfraErrorKind::Other("DbErr".into()), "Database operation failed")
}
