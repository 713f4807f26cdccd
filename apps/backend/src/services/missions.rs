//! Chore missions: create, submit proof, judge.

use sea_orm::ConnectionTrait;
use serde::Deserialize;
use tracing::info;

use crate::entities::missions::{self, MissionOwner, MissionStatus};
use crate::entities::profiles;
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};
use crate::repos::missions::{self as missions_repo, MissionCreate, MissionUpdate};
use crate::services::settlement::{self, RewardGrant, SettlementOutcome};

pub const MIN_MISSION_XP: i32 = 1;
pub const MAX_MISSION_XP: i32 = 1_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMission {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration: String,
    pub xp: i32,
    pub owner: MissionOwner,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionOutcome {
    pub mission: missions::Model,
    pub settlement: Option<SettlementOutcome>,
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyInput,
            format!("{field} must not be empty"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Load a mission, check the client's version and the required status.
async fn load_in_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    mission_id: i64,
    expected_lock_version: Option<i32>,
    status: MissionStatus,
) -> Result<(missions::Model, i32), DomainError> {
    let mission = missions_repo::require_mission(conn, mission_id).await?;
    let expected = expected_lock_version.unwrap_or(mission.lock_version);
    if expected != mission.lock_version {
        return Err(DomainError::optimistic_lock(expected, mission.lock_version));
    }
    if mission.status != status {
        return Err(DomainError::validation(
            ValidationKind::InvalidStatus,
            format!(
                "Mission {mission_id} is {:?}, expected {:?}",
                mission.status, status
            ),
        ));
    }
    Ok((mission, expected))
}

/// Mission domain service.
#[derive(Debug, Default, Clone)]
pub struct MissionService;

impl MissionService {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_mission<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        creator: &profiles::Model,
        input: NewMission,
    ) -> Result<missions::Model, DomainError> {
        if !(MIN_MISSION_XP..=MAX_MISSION_XP).contains(&input.xp) {
            return Err(DomainError::validation(
                ValidationKind::InvalidAmount,
                format!("Mission XP must be between {MIN_MISSION_XP} and {MAX_MISSION_XP}"),
            ));
        }
        let dto = MissionCreate {
            title: required("Title", &input.title)?,
            description: input.description.trim().to_string(),
            duration: required("Duration", &input.duration)?,
            xp: input.xp,
            owner: input.owner,
            emoji: required("Emoji", &input.emoji)?,
            created_by: Some(creator.id),
        };
        let mission = missions_repo::create_mission(conn, dto).await?;
        info!(mission_id = mission.id, creator = creator.id, xp = mission.xp, "Mission created");
        Ok(mission)
    }

    /// Active and pending missions, newest first.
    pub async fn list_open<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<missions::Model>, DomainError> {
        missions_repo::list_by_status(
            conn,
            &[MissionStatus::Active, MissionStatus::PendingApproval],
        )
        .await
    }

    pub async fn list_completed<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<missions::Model>, DomainError> {
        missions_repo::list_by_status(conn, &[MissionStatus::Completed]).await
    }

    /// ACTIVE → PENDING_APPROVAL with a proof image.
    pub async fn submit_proof<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        mission_id: i64,
        submitter: &profiles::Model,
        proof_url: &str,
        expected_lock_version: Option<i32>,
    ) -> Result<missions::Model, DomainError> {
        let proof_url = required("Proof URL", proof_url)?;
        let (_, expected) =
            load_in_status(conn, mission_id, expected_lock_version, MissionStatus::Active).await?;

        let updated = missions_repo::update_mission(
            conn,
            MissionUpdate::new(mission_id, expected, MissionStatus::PendingApproval)
                .with_proof(proof_url, submitter.id),
        )
        .await?;
        info!(mission_id, submitter = submitter.id, "Mission proof submitted");
        Ok(updated)
    }

    /// PENDING_APPROVAL → COMPLETED and pay the submitter once.
    pub async fn approve<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        mission_id: i64,
        judge: &profiles::Model,
        expected_lock_version: Option<i32>,
    ) -> Result<MissionOutcome, DomainError> {
        let (mission, expected) = load_in_status(
            conn,
            mission_id,
            expected_lock_version,
            MissionStatus::PendingApproval,
        )
        .await?;
        let submitter = mission.submitted_by.ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Pending mission {mission_id} has no submitter"),
            )
        })?;
        if submitter == judge.id {
            return Err(DomainError::validation(
                ValidationKind::InsufficientRole,
                "You cannot approve your own mission",
            ));
        }

        let updated = missions_repo::update_mission(
            conn,
            MissionUpdate::new(mission_id, expected, MissionStatus::Completed),
        )
        .await?;

        let outcome = settlement::settle(
            conn,
            RewardGrant {
                event_key: settlement::mission_event_key(mission_id),
                profile_id: submitter,
                amount: i64::from(updated.xp),
            },
        )
        .await?;
        info!(mission_id, judge = judge.id, submitter, "Mission approved");

        Ok(MissionOutcome {
            mission: updated,
            settlement: Some(outcome),
        })
    }

    /// PENDING_APPROVAL → ACTIVE; the proof is discarded.
    pub async fn reject<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        mission_id: i64,
        judge: &profiles::Model,
        expected_lock_version: Option<i32>,
    ) -> Result<MissionOutcome, DomainError> {
        let (mission, expected) = load_in_status(
            conn,
            mission_id,
            expected_lock_version,
            MissionStatus::PendingApproval,
        )
        .await?;
        if mission.submitted_by == Some(judge.id) {
            return Err(DomainError::validation(
                ValidationKind::InsufficientRole,
                "You cannot judge your own mission",
            ));
        }

        let updated = missions_repo::update_mission(
            conn,
            MissionUpdate::new(mission_id, expected, MissionStatus::Active).clearing_proof(),
        )
        .await?;
        info!(mission_id, judge = judge.id, "Mission rejected");

        Ok(MissionOutcome {
            mission: updated,
            settlement: None,
        })
    }
}
