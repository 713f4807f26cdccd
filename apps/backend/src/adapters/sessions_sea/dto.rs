//! DTOs for sessions_sea adapter.

use serde_json::Value;

use crate::entities::game_sessions::GameType;

/// DTO for creating a session; the creator moves first.
#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub game_type: GameType,
    pub player_a: i64,
    pub player_b: i64,
    pub turn_owner: i64,
    pub state: Value,
}

impl SessionCreate {
    /// The pair in canonical order, independent of who created the session.
    pub fn pair(&self) -> (i64, i64) {
        (
            self.player_a.min(self.player_b),
            self.player_a.max(self.player_b),
        )
    }

    pub fn new(game_type: GameType, creator: i64, partner: i64, state: Value) -> Self {
        Self {
            game_type,
            player_a: creator,
            player_b: partner,
            turn_owner: creator,
            state,
        }
    }
}

/// Conditional write of state and turn ownership.
///
/// Applies only when the stored `lock_version` still equals `expected_lock_version`.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub id: i64,
    pub expected_lock_version: i32,
    pub state: Value,
    pub turn_owner: i64,
}

/// A session the idle sweep archived, with its new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivedSession {
    pub id: i64,
    pub lock_version: i32,
}
