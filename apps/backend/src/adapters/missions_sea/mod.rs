//! SeaORM adapter for missions - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::missions::{self, MissionStatus};
use crate::infra::db_errors::{optimistic_lock_err, MISSION_NOT_FOUND_PREFIX};

pub mod dto;

pub use dto::{MissionCreate, MissionUpdate};

fn not_found(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("{MISSION_NOT_FOUND_PREFIX}{id}"))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    mission_id: i64,
) -> Result<Option<missions::Model>, sea_orm::DbErr> {
    missions::Entity::find_by_id(mission_id).one(conn).await
}

pub async fn require_mission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    mission_id: i64,
) -> Result<missions::Model, sea_orm::DbErr> {
    find_by_id(conn, mission_id)
        .await?
        .ok_or_else(|| not_found(mission_id))
}

pub async fn create_mission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MissionCreate,
) -> Result<missions::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let mission = missions::ActiveModel {
        id: NotSet,
        title: Set(dto.title),
        description: Set(dto.description),
        duration: Set(dto.duration),
        xp: Set(dto.xp),
        owner: Set(dto.owner),
        emoji: Set(dto.emoji),
        status: Set(MissionStatus::Active),
        proof_url: Set(None),
        submitted_by: Set(None),
        created_by: Set(dto.created_by),
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };

    mission.insert(conn).await
}

/// Missions in any of `statuses`, newest first.
pub async fn list_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    statuses: &[MissionStatus],
) -> Result<Vec<missions::Model>, sea_orm::DbErr> {
    missions::Entity::find()
        .filter(missions::Column::Status.is_in(statuses.iter().copied()))
        .order_by_desc(missions::Column::CreatedAt)
        .order_by_desc(missions::Column::Id)
        .all(conn)
        .await
}

/// Conditional status change; same NotFound/OptimisticLock split as sessions.
pub async fn update_mission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MissionUpdate,
) -> Result<missions::Model, sea_orm::DbErr> {
    let mut update = missions::Entity::update_many()
        .col_expr(missions::Column::Status, Expr::val(dto.status).into())
        .col_expr(
            missions::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .col_expr(
            missions::Column::LockVersion,
            Expr::col(missions::Column::LockVersion).add(1),
        );
    if let Some(proof_url) = dto.proof_url {
        update = update.col_expr(missions::Column::ProofUrl, Expr::val(proof_url).into());
    }
    if let Some(submitted_by) = dto.submitted_by {
        update = update.col_expr(missions::Column::SubmittedBy, Expr::val(submitted_by).into());
    }

    let result = update
        .filter(missions::Column::Id.eq(dto.id))
        .filter(missions::Column::LockVersion.eq(dto.expected_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, dto.id).await? {
            Some(current) => Err(optimistic_lock_err(
                dto.expected_lock_version,
                current.lock_version,
            )),
            None => Err(not_found(dto.id)),
        };
    }

    require_mission(conn, dto.id).await
}
