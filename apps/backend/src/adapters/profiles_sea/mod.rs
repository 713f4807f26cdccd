//! SeaORM adapter for profiles - generic over ConnectionTrait.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::profiles;

pub mod dto;

pub use dto::ProfileCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
    profiles::Entity::find_by_id(profile_id).one(conn).await
}

pub async fn find_by_user_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_key: &str,
) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::UserKey.eq(user_key))
        .one(conn)
        .await
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<profiles::Model>, sea_orm::DbErr> {
    profiles::Entity::find()
        .order_by_asc(profiles::Column::Id)
        .all(conn)
        .await
}

/// Insert unless a profile with the same `user_key` exists. Returns rows inserted.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProfileCreate,
) -> Result<u64, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let profile = profiles::ActiveModel {
        id: NotSet,
        user_key: Set(dto.user_key),
        display_name: Set(dto.display_name),
        role: Set(dto.role),
        avatar_url: Set(dto.avatar_url),
        xp: Set(0),
        level: Set(1),
        streak: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    profiles::Entity::insert(profile)
        .on_conflict(
            OnConflict::column(profiles::Column::UserKey)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

/// `xp = xp + amount` in SQL; no read-modify-write. Returns rows affected.
pub async fn add_xp<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
    amount: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = profiles::Entity::update_many()
        .col_expr(profiles::Column::Xp, Expr::col(profiles::Column::Xp).add(amount))
        .col_expr(
            profiles::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(profiles::Column::Id.eq(profile_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_level<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
    level: i32,
) -> Result<(), sea_orm::DbErr> {
    profiles::Entity::update_many()
        .col_expr(profiles::Column::Level, Expr::val(level).into())
        .filter(profiles::Column::Id.eq(profile_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Zero XP, level and streak for everyone. Returns rows affected.
pub async fn reset_all_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    let result = profiles::Entity::update_many()
        .col_expr(profiles::Column::Xp, Expr::val(0i64).into())
        .col_expr(profiles::Column::Level, Expr::val(1i32).into())
        .col_expr(profiles::Column::Streak, Expr::val(0i32).into())
        .col_expr(
            profiles::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
