//! SeaORM adapter for game sessions - generic over ConnectionTrait.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::game_sessions::{self, GameType};
use crate::infra::db_errors::{optimistic_lock_err, SESSION_NOT_FOUND_PREFIX};

pub mod dto;

pub use dto::{ArchivedSession, SessionCreate, SessionUpdate};

fn not_found(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("{SESSION_NOT_FOUND_PREFIX}{id}"))
}

/// Run a conditional update keyed on `lock_version`, then refetch.
///
/// Zero affected rows means either the row is gone (NotFound) or another
/// writer got there first (OptimisticLock with the version now stored).
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    expected_lock_version: i32,
    configure_update: F,
) -> Result<game_sessions::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(
        sea_orm::UpdateMany<game_sessions::Entity>,
    ) -> sea_orm::UpdateMany<game_sessions::Entity>,
{
    let now = OffsetDateTime::now_utc();

    let result = configure_update(game_sessions::Entity::update_many())
        .col_expr(game_sessions::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            game_sessions::Column::LockVersion,
            Expr::col(game_sessions::Column::LockVersion).add(1),
        )
        .filter(game_sessions::Column::Id.eq(id))
        .filter(game_sessions::Column::LockVersion.eq(expected_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, id).await? {
            Some(current) => Err(optimistic_lock_err(
                expected_lock_version,
                current.lock_version,
            )),
            None => Err(not_found(id)),
        };
    }

    require_session(conn, id).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<game_sessions::Model>, sea_orm::DbErr> {
    game_sessions::Entity::find_by_id(session_id).one(conn).await
}

/// Find session by ID or fail with a structured not-found error.
pub async fn require_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<game_sessions::Model, sea_orm::DbErr> {
    find_by_id(conn, session_id)
        .await?
        .ok_or_else(|| not_found(session_id))
}

/// The live session between `x` and `y`, in either seat order.
///
/// The live-pair unique index allows at most one such row.
pub async fn find_latest_for_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_type: GameType,
    x: i64,
    y: i64,
) -> Result<Option<game_sessions::Model>, sea_orm::DbErr> {
    game_sessions::Entity::find()
        .filter(game_sessions::Column::GameType.eq(game_type))
        .filter(game_sessions::Column::ArchivedAt.is_null())
        .filter(game_sessions::Column::PairLow.eq(x.min(y)))
        .filter(game_sessions::Column::PairHigh.eq(x.max(y)))
        .order_by_desc(game_sessions::Column::UpdatedAt)
        .order_by_desc(game_sessions::Column::Id)
        .one(conn)
        .await
}

/// Insert a live session unless the pair already has one.
///
/// Returns rows inserted (0 or 1). A concurrent opener loses on the
/// live-pair unique index and sees 0; callers re-read the winner's row.
pub async fn insert_live_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<u64, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let (pair_low, pair_high) = dto.pair();
    let session = game_sessions::ActiveModel {
        id: NotSet,
        game_type: Set(dto.game_type),
        player_a: Set(dto.player_a),
        player_b: Set(dto.player_b),
        pair_low: Set(pair_low),
        pair_high: Set(pair_high),
        turn_owner: Set(dto.turn_owner),
        state: Set(dto.state),
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
        archived_at: Set(None),
    };

    game_sessions::Entity::insert(session)
        .on_conflict(OnConflict::new().do_nothing().to_owned())
        .exec_without_returning(conn)
        .await
}

pub async fn update_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionUpdate,
) -> Result<game_sessions::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, dto.id, dto.expected_lock_version, |update| {
        update
            .col_expr(game_sessions::Column::State, Expr::val(dto.state).into())
            .col_expr(
                game_sessions::Column::TurnOwner,
                Expr::val(dto.turn_owner).into(),
            )
    })
    .await
}

/// Live sessions a profile sits in, most recent first.
pub async fn list_for_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: i64,
) -> Result<Vec<game_sessions::Model>, sea_orm::DbErr> {
    game_sessions::Entity::find()
        .filter(game_sessions::Column::ArchivedAt.is_null())
        .filter(
            Condition::any()
                .add(game_sessions::Column::PlayerA.eq(profile_id))
                .add(game_sessions::Column::PlayerB.eq(profile_id)),
        )
        .order_by_desc(game_sessions::Column::UpdatedAt)
        .order_by_desc(game_sessions::Column::Id)
        .all(conn)
        .await
}

/// Archive every live session last touched before `cutoff`.
///
/// Each row is archived with its own conditional update, so a session that
/// moved after the scan is left alone. Returns the archived rows with their
/// bumped `lock_version`; `updated_at` keeps the last activity time.
pub async fn archive_idle<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    cutoff: OffsetDateTime,
) -> Result<Vec<ArchivedSession>, sea_orm::DbErr> {
    let candidates: Vec<(i64, i32)> = game_sessions::Entity::find()
        .select_only()
        .column(game_sessions::Column::Id)
        .column(game_sessions::Column::LockVersion)
        .filter(game_sessions::Column::ArchivedAt.is_null())
        .filter(game_sessions::Column::UpdatedAt.lt(cutoff))
        .into_tuple()
        .all(conn)
        .await?;

    let now = OffsetDateTime::now_utc();
    let mut archived = Vec::with_capacity(candidates.len());
    for (id, lock_version) in candidates {
        let result = game_sessions::Entity::update_many()
            .col_expr(game_sessions::Column::ArchivedAt, Expr::val(Some(now)).into())
            .col_expr(
                game_sessions::Column::LockVersion,
                Expr::col(game_sessions::Column::LockVersion).add(1),
            )
            .filter(game_sessions::Column::Id.eq(id))
            .filter(game_sessions::Column::LockVersion.eq(lock_version))
            .filter(game_sessions::Column::ArchivedAt.is_null())
            .exec(conn)
            .await?;
        if result.rows_affected == 1 {
            archived.push(ArchivedSession {
                id,
                lock_version: lock_version + 1,
            });
        }
    }
    Ok(archived)
}
