use sea_orm::ConnectionTrait;

use crate::adapters::rewards_sea as rewards_adapter;
use crate::entities::reward_grants;
use crate::errors::domain::DomainError;

/// Claim `event_key` for this grant. `false` means it was already claimed.
pub async fn claim_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_key: &str,
    profile_id: i64,
    amount: i64,
) -> Result<bool, DomainError> {
    let dto = rewards_adapter::GrantCreate {
        event_key: event_key.to_string(),
        profile_id,
        amount,
    };
    Ok(rewards_adapter::insert_if_absent(conn, dto).await? > 0)
}

pub async fn find_by_event_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_key: &str,
) -> Result<Option<reward_grants::Model>, DomainError> {
    Ok(rewards_adapter::find_by_event_key(conn, event_key).await?)
}

pub async fn list_for_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
) -> Result<Vec<reward_grants::Model>, DomainError> {
    Ok(rewards_adapter::list_for_profile(conn, profile_id).await?)
}
