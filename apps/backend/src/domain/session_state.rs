use serde_json::Value;

use crate::domain::turn::{self, CharadesState, ProfileId, RewardClaim, Seats, TurnAction};
use crate::entities::game_sessions::GameType;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Decoded `game_sessions.state`, one variant per game type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    EmojiCharades(CharadesState),
}

/// Result of applying an action to any game's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub state: SessionState,
    pub turn_owner: ProfileId,
    pub reward: Option<RewardClaim>,
}

impl SessionState {
    /// Fresh state for a newly paired session.
    pub fn initial(game_type: GameType) -> Self {
        match game_type {
            GameType::EmojiCharades => SessionState::EmojiCharades(CharadesState::new()),
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            SessionState::EmojiCharades(_) => GameType::EmojiCharades,
        }
    }

    /// Strictly decode the stored blob for `game_type`.
    ///
    /// The flattened phase tag lets serde skip unknown keys, so a blob is
    /// only accepted when it re-encodes to exactly itself.
    pub fn decode(game_type: GameType, blob: &Value) -> Result<Self, DomainError> {
        let state = match game_type {
            GameType::EmojiCharades => serde_json::from_value::<CharadesState>(blob.clone())
                .map(SessionState::EmojiCharades)
                .map_err(|e| {
                    DomainError::infra(
                        InfraErrorKind::DataCorruption,
                        format!("Stored {game_type:?} state is malformed: {e}"),
                    )
                })?,
        };
        if state.encode()? != *blob {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Stored {game_type:?} state has fields its phase does not allow"),
            ));
        }
        Ok(state)
    }

    pub fn encode(&self) -> Result<Value, DomainError> {
        let encoded = match self {
            SessionState::EmojiCharades(state) => serde_json::to_value(state),
        };
        encoded.map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Failed to encode session state: {e}"),
            )
        })
    }

    pub fn apply(
        &self,
        seats: Seats,
        turn_owner: ProfileId,
        actor: ProfileId,
        action: TurnAction,
    ) -> Result<Applied, DomainError> {
        match self {
            SessionState::EmojiCharades(state) => {
                let t = turn::apply(state, seats, turn_owner, actor, action)?;
                Ok(Applied {
                    state: SessionState::EmojiCharades(t.state),
                    turn_owner: t.turn_owner,
                    reward: t.reward,
                })
            }
        }
    }
}
