//! Session repository: persistence plus strict decoding of the state blob.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::sessions_sea as sessions_adapter;
use crate::domain::{ProfileId, Seats, SessionState};
use crate::entities::game_sessions::{self, GameType};
use crate::errors::domain::{DomainError, InfraErrorKind};

pub use sessions_adapter::ArchivedSession;

/// A session as the service layer sees it: seats checked, state decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: i64,
    pub game_type: GameType,
    pub seats: Seats,
    pub turn_owner: ProfileId,
    pub state: SessionState,
    pub lock_version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub archived_at: Option<OffsetDateTime>,
}

impl Session {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

impl TryFrom<game_sessions::Model> for Session {
    type Error = DomainError;

    fn try_from(model: game_sessions::Model) -> Result<Self, Self::Error> {
        let seats = Seats::new(model.player_a, model.player_b).map_err(|_| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Session {} seats the same player twice", model.id),
            )
        })?;
        let state = SessionState::decode(model.game_type, &model.state)?;
        Ok(Self {
            id: model.id,
            game_type: model.game_type,
            seats,
            turn_owner: model.turn_owner,
            state,
            lock_version: model.lock_version,
            created_at: model.created_at,
            updated_at: model.updated_at,
            archived_at: model.archived_at,
        })
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<Session>, DomainError> {
    sessions_adapter::find_by_id(conn, session_id)
        .await?
        .map(Session::try_from)
        .transpose()
}

pub async fn require_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Session, DomainError> {
    Session::try_from(sessions_adapter::require_session(conn, session_id).await?)
}

pub async fn find_latest_for_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_type: GameType,
    x: ProfileId,
    y: ProfileId,
) -> Result<Option<Session>, DomainError> {
    sessions_adapter::find_latest_for_pair(conn, game_type, x, y)
        .await?
        .map(Session::try_from)
        .transpose()
}

/// Insert a fresh session with `creator` to move first, unless the pair
/// already has a live one. `true` means this call created the row.
pub async fn create_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_type: GameType,
    creator: ProfileId,
    partner: ProfileId,
) -> Result<bool, DomainError> {
    let state = SessionState::initial(game_type).encode()?;
    let dto = sessions_adapter::SessionCreate::new(game_type, creator, partner, state);
    Ok(sessions_adapter::insert_live_if_absent(conn, dto).await? > 0)
}

/// Compare-and-swap write of a new state; fails with OptimisticLock on a stale version.
pub async fn update_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    expected_lock_version: i32,
    state: &SessionState,
    turn_owner: ProfileId,
) -> Result<Session, DomainError> {
    let dto = sessions_adapter::SessionUpdate {
        id: session_id,
        expected_lock_version,
        state: state.encode()?,
        turn_owner,
    };
    Session::try_from(sessions_adapter::update_session(conn, dto).await?)
}

pub async fn list_for_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: ProfileId,
) -> Result<Vec<Session>, DomainError> {
    sessions_adapter::list_for_profile(conn, profile_id)
        .await?
        .into_iter()
        .map(Session::try_from)
        .collect()
}

pub async fn archive_idle<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    cutoff: OffsetDateTime,
) -> Result<Vec<ArchivedSession>, DomainError> {
    Ok(sessions_adapter::archive_idle(conn, cutoff).await?)
}
