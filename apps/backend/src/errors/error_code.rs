//! Error codes for the Kinquest backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Kinquest backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Access denied
    Forbidden,
    /// Authenticated subject has no profile yet
    ForbiddenProfileNotFound,
    /// Caller is not one of the two session participants
    NotAParticipant,
    /// Caller's role does not allow this operation
    InsufficientRole,

    // Request Validation
    /// Invalid session ID provided
    InvalidSessionId,
    /// Action submitted by the participant who does not own the turn
    OutOfTurn,
    /// Action does not fit the current phase
    PhaseMismatch,
    /// Required text field was blank
    EmptyInput,
    /// Both participants are the same profile
    SamePlayer,
    /// Amount out of range
    InvalidAmount,
    /// Mission status does not allow the operation
    InvalidMissionStatus,
    /// Session is archived
    SessionArchived,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Invalid or missing HTTP header
    InvalidHeader,
    /// Precondition (lock version) required for this operation
    PreconditionRequired,

    // Resource Not Found
    /// Session not found
    SessionNotFound,
    /// Profile not found
    ProfileNotFound,
    /// Mission not found
    MissionNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Optimistic lock conflict
    OptimisticLock,
    /// Profile already exists for this subject
    UniqueProfile,
    /// Profile exists but could not be loaded
    ProfileUnavailable,
    /// Generic conflict
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Unique constraint violation
    UniqueViolation,
    /// Record not found (DB-driven)
    RecordNotFound,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenProfileNotFound => "FORBIDDEN_PROFILE_NOT_FOUND",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",

            Self::InvalidSessionId => "INVALID_SESSION_ID",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::SamePlayer => "SAME_PLAYER",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidMissionStatus => "INVALID_MISSION_STATUS",
            Self::SessionArchived => "SESSION_ARCHIVED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::PreconditionRequired => "PRECONDITION_REQUIRED",

            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::MissionNotFound => "MISSION_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UniqueProfile => "UNIQUE_PROFILE",
            Self::ProfileUnavailable => "PROFILE_UNAVAILABLE",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
