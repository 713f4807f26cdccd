//! SeaORM adapter for the reward grant ledger.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::reward_grants;

pub mod dto;

pub use dto::GrantCreate;

/// Record a grant unless its `event_key` is already present. Returns rows inserted.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GrantCreate,
) -> Result<u64, sea_orm::DbErr> {
    let grant = reward_grants::ActiveModel {
        id: NotSet,
        event_key: Set(dto.event_key),
        profile_id: Set(dto.profile_id),
        amount: Set(dto.amount),
        created_at: Set(OffsetDateTime::now_utc()),
    };

    reward_grants::Entity::insert(grant)
        .on_conflict(
            OnConflict::column(reward_grants::Column::EventKey)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

pub async fn find_by_event_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_key: &str,
) -> Result<Option<reward_grants::Model>, sea_orm::DbErr> {
    reward_grants::Entity::find()
        .filter(reward_grants::Column::EventKey.eq(event_key))
        .one(conn)
        .await
}

/// Grants for one profile, newest first.
pub async fn list_for_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
) -> Result<Vec<reward_grants::Model>, sea_orm::DbErr> {
    reward_grants::Entity::find()
        .filter(reward_grants::Column::ProfileId.eq(profile_id))
        .order_by_desc(reward_grants::Column::Id)
        .all(conn)
        .await
}
