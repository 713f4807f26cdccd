use sea_orm::ConnectionTrait;

use crate::adapters::missions_sea as missions_adapter;
use crate::entities::missions::{self, MissionStatus};
use crate::errors::domain::DomainError;

pub use missions_adapter::{MissionCreate, MissionUpdate};

pub async fn require_mission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    mission_id: i64,
) -> Result<missions::Model, DomainError> {
    Ok(missions_adapter::require_mission(conn, mission_id).await?)
}

pub async fn create_mission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MissionCreate,
) -> Result<missions::Model, DomainError> {
    Ok(missions_adapter::create_mission(conn, dto).await?)
}

pub async fn list_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    statuses: &[MissionStatus],
) -> Result<Vec<missions::Model>, DomainError> {
    Ok(missions_adapter::list_by_status(conn, statuses).await?)
}

pub async fn update_mission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MissionUpdate,
) -> Result<missions::Model, DomainError> {
    Ok(missions_adapter::update_mission(conn, dto).await?)
}
