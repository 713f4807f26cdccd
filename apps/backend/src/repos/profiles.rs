use sea_orm::ConnectionTrait;

use crate::adapters::profiles_sea as profiles_adapter;
use crate::entities::profiles;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use profiles_adapter::ProfileCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
) -> Result<Option<profiles::Model>, DomainError> {
    Ok(profiles_adapter::find_by_id(conn, profile_id).await?)
}

pub async fn require_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
) -> Result<profiles::Model, DomainError> {
    find_by_id(conn, profile_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Profile, format!("Profile {profile_id} not found"))
    })
}

pub async fn find_by_user_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_key: &str,
) -> Result<Option<profiles::Model>, DomainError> {
    Ok(profiles_adapter::find_by_user_key(conn, user_key).await?)
}

pub async fn list_profiles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<profiles::Model>, DomainError> {
    Ok(profiles_adapter::list_all(conn).await?)
}

/// Returns `true` when this call created the row.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProfileCreate,
) -> Result<bool, DomainError> {
    Ok(profiles_adapter::insert_if_absent(conn, dto).await? > 0)
}

/// Atomically add `amount` XP and return the refreshed profile.
pub async fn add_xp<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
    amount: i64,
) -> Result<profiles::Model, DomainError> {
    if profiles_adapter::add_xp(conn, profile_id, amount).await? == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Profile,
            format!("Profile {profile_id} not found"),
        ));
    }
    require_profile(conn, profile_id).await
}

pub async fn set_level<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
    level: i32,
) -> Result<(), DomainError> {
    Ok(profiles_adapter::set_level(conn, profile_id, level).await?)
}

pub async fn reset_all_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    Ok(profiles_adapter::reset_all_progress(conn).await?)
}
