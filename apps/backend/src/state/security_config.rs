use jsonwebtoken::Algorithm;

use crate::config::db::must_var;
use crate::error::AppError;

/// Default access-token lifetime: one family evening.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

/// JWT signing settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub token_ttl_secs: i64,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Read `BACKEND_JWT_SECRET`; required in every environment.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = must_var("BACKEND_JWT_SECRET")?;
        if secret.len() < 16 {
            return Err(AppError::config(
                "BACKEND_JWT_SECRET must be at least 16 bytes",
            ));
        }
        Ok(Self::new(secret.into_bytes()))
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
