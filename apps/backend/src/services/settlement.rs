//! Reward settlement: credit XP exactly once per logical event.
//!
//! The grant row is inserted first with ON CONFLICT DO NOTHING on its
//! `event_key`; only the caller that actually inserted it moves the balance.
//! A retried or duplicated settlement therefore never double-credits.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::progression::level_for_xp;
use crate::domain::ProfileId;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::{profiles, rewards};

/// Event key for the reward of one charades round.
pub fn session_event_key(session_id: i64, round: u32) -> String {
    format!("session:{session_id}:round:{round}")
}

/// Event key for a mission's completion reward.
pub fn mission_event_key(mission_id: i64) -> String {
    format!("mission:{mission_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardGrant {
    pub event_key: String,
    pub profile_id: ProfileId,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SettlementOutcome {
    Credited {
        profile_id: ProfileId,
        amount: i64,
        new_xp: i64,
        new_level: i32,
        leveled_up: bool,
    },
    AlreadySettled {
        event_key: String,
    },
}

impl SettlementOutcome {
    pub fn is_credited(&self) -> bool {
        matches!(self, SettlementOutcome::Credited { .. })
    }
}

/// Apply `grant` at most once.
pub async fn settle<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    grant: RewardGrant,
) -> Result<SettlementOutcome, DomainError> {
    if grant.amount <= 0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidAmount,
            format!("Reward amount must be positive, got {}", grant.amount),
        ));
    }

    let claimed =
        rewards::claim_event(conn, &grant.event_key, grant.profile_id, grant.amount).await?;
    if !claimed {
        debug!(event_key = %grant.event_key, "Reward already settled; skipping");
        return Ok(SettlementOutcome::AlreadySettled {
            event_key: grant.event_key,
        });
    }

    let profile = profiles::add_xp(conn, grant.profile_id, grant.amount).await?;
    let new_level = level_for_xp(profile.xp);
    if new_level != profile.level {
        profiles::set_level(conn, profile.id, new_level).await?;
    }
    let leveled_up = new_level > profile.level;

    info!(
        event_key = %grant.event_key,
        profile_id = profile.id,
        amount = grant.amount,
        new_xp = profile.xp,
        new_level,
        leveled_up,
        "Reward settled"
    );

    Ok(SettlementOutcome::Credited {
        profile_id: profile.id,
        amount: grant.amount,
        new_xp: profile.xp,
        new_level,
        leveled_up,
    })
}
