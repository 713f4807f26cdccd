//! Profile lifecycle: first-login auto-heal and season resets.

use std::future::Future;
use std::time::Duration;

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::entities::profiles::{self, FamilyRole};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::logging::pii::Redacted;
use crate::repos::profiles as profiles_repo;
use crate::repos::profiles::ProfileCreate;

/// Times a freshly created profile is re-read before giving up.
pub const PROFILE_FETCH_ATTEMPTS: u32 = 3;
pub const PROFILE_FETCH_DELAY: Duration = Duration::from_secs(1);

/// Poll `fetch` until it yields a value, at most `attempts` times.
async fn fetch_with_retry<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut fetch: F,
) -> Result<Option<T>, DomainError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, DomainError>>,
{
    for attempt in 1..=attempts {
        if let Some(found) = fetch(attempt).await? {
            return Ok(Some(found));
        }
        if attempt < attempts {
            warn!(attempt, attempts, "Profile not readable yet; retrying");
            tokio::time::sleep(delay).await;
        }
    }
    Ok(None)
}

#[derive(Debug, Clone)]
pub struct ProfileService {
    attempts: u32,
    retry_delay: Duration,
}

impl ProfileService {
    pub fn new() -> Self {
        Self {
            attempts: PROFILE_FETCH_ATTEMPTS,
            retry_delay: PROFILE_FETCH_DELAY,
        }
    }

    pub fn with_retry(mut self, attempts: u32, retry_delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Find the caller's profile, creating it on first login.
    ///
    /// Returns the profile and whether this call created it. A concurrent
    /// first login for the same `user_key` is absorbed by the unique index;
    /// the loser re-reads the winner's row.
    pub async fn ensure_profile<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_key: &str,
        display_name: &str,
        role: FamilyRole,
    ) -> Result<(profiles::Model, bool), DomainError> {
        if let Some(existing) = profiles_repo::find_by_user_key(conn, user_key).await? {
            return Ok((existing, false));
        }

        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::EmptyInput,
                "Display name must not be empty",
            ));
        }

        let created = profiles_repo::insert_if_absent(
            conn,
            ProfileCreate::new(user_key, display_name, role),
        )
        .await?;

        let found = fetch_with_retry(self.attempts, self.retry_delay, |_| {
            profiles_repo::find_by_user_key(conn, user_key)
        })
        .await?;

        match found {
            Some(profile) => {
                if created {
                    info!(
                        profile_id = profile.id,
                        user_key = %Redacted(user_key),
                        role = ?profile.role,
                        "Profile created"
                    );
                }
                Ok((profile, created))
            }
            None => Err(DomainError::conflict(
                ConflictKind::ProfileUnavailable,
                "Your profile is still being set up; please refresh",
            )),
        }
    }

    /// Start a new season: everyone back to zero XP. Parents only.
    pub async fn reset_season<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &profiles::Model,
    ) -> Result<u64, DomainError> {
        if !actor.role.is_parent() {
            return Err(DomainError::validation(
                ValidationKind::InsufficientRole,
                "Only a parent can reset the season",
            ));
        }
        let reset = profiles_repo::reset_all_progress(conn).await?;
        info!(actor = actor.id, profiles = reset, "Season reset");
        Ok(reset)
    }
}

impl Default for ProfileService {
    fn default() -> Self {
        Self::new()
    }
}
