//! DTOs for missions_sea adapter.

use crate::entities::missions::{MissionOwner, MissionStatus};

#[derive(Debug, Clone)]
pub struct MissionCreate {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub xp: i32,
    pub owner: MissionOwner,
    pub emoji: String,
    pub created_by: Option<i64>,
}

/// Status change guarded by `lock_version`.
///
/// `proof_url` and `submitted_by` are three-state: `None` leaves the column
/// alone, `Some(None)` clears it, `Some(Some(v))` sets it.
#[derive(Debug, Clone)]
pub struct MissionUpdate {
    pub id: i64,
    pub expected_lock_version: i32,
    pub status: MissionStatus,
    pub proof_url: Option<Option<String>>,
    pub submitted_by: Option<Option<i64>>,
}

impl MissionUpdate {
    pub fn new(id: i64, expected_lock_version: i32, status: MissionStatus) -> Self {
        Self {
            id,
            expected_lock_version,
            status,
            proof_url: None,
            submitted_by: None,
        }
    }

    pub fn with_proof(mut self, proof_url: String, submitted_by: i64) -> Self {
        self.proof_url = Some(Some(proof_url));
        self.submitted_by = Some(Some(submitted_by));
        self
    }

    pub fn clearing_proof(mut self) -> Self {
        self.proof_url = Some(None);
        self.submitted_by = Some(None);
        self
    }
}
