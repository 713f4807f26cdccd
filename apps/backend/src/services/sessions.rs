//! Session orchestration: pairing, views and turn actions.

use std::time::Duration;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::progression::CORRECT_GUESS_REWARD_XP;
use crate::domain::{turn, PhaseKind, ProfileId, RoundPhase, SessionState, TurnAction};
use crate::entities::game_sessions::GameType;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::repos::sessions::{self, ArchivedSession, Session};
use crate::repos::profiles;
use crate::services::settlement::{self, RewardGrant, SettlementOutcome};

/// What one participant is allowed to see of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: i64,
    pub game_type: GameType,
    pub player_a: ProfileId,
    pub player_b: ProfileId,
    pub turn_owner: ProfileId,
    pub is_my_turn: bool,
    pub phase: PhaseKind,
    pub round_count: u32,
    /// Hidden from the guesser while they are guessing.
    pub secret_phrase: Option<String>,
    pub clue: Option<String>,
    pub current_guess: Option<String>,
    pub lock_version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub archived: bool,
}

impl SessionView {
    pub fn for_viewer(session: &Session, viewer: ProfileId) -> Self {
        let is_my_turn = session.turn_owner == viewer && !session.is_archived();
        let SessionState::EmojiCharades(state) = &session.state;
        let (secret_phrase, clue, current_guess) = match &state.phase {
            RoundPhase::Generating => (None, None, None),
            RoundPhase::Guessing { secret_phrase, clue } => {
                let guesser = session.turn_owner;
                let secret = (viewer != guesser).then(|| secret_phrase.clone());
                (secret, Some(clue.clone()), None)
            }
            RoundPhase::Reviewing {
                secret_phrase,
                clue,
                current_guess,
            } => (
                Some(secret_phrase.clone()),
                Some(clue.clone()),
                Some(current_guess.clone()),
            ),
        };

        Self {
            id: session.id,
            game_type: session.game_type,
            player_a: session.seats.player_a,
            player_b: session.seats.player_b,
            turn_owner: session.turn_owner,
            is_my_turn,
            phase: state.phase.kind(),
            round_count: state.round_count,
            secret_phrase,
            clue,
            current_guess,
            lock_version: session.lock_version,
            updated_at: session.updated_at,
            archived: session.is_archived(),
        }
    }
}

/// Result of an accepted action: the stored session and any reward paid.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub session: Session,
    pub settlement: Option<SettlementOutcome>,
}

/// Session domain service.
#[derive(Debug, Clone)]
pub struct SessionService {
    reward_xp: i64,
}

impl SessionService {
    pub fn new(reward_xp: i64) -> Self {
        Self { reward_xp }
    }

    fn ensure_participant(session: &Session, profile_id: ProfileId) -> Result<(), DomainError> {
        if session.seats.contains(profile_id) {
            Ok(())
        } else {
            Err(DomainError::validation(
                ValidationKind::NotAParticipant,
                format!("Profile {profile_id} is not part of session {}", session.id),
            ))
        }
    }

    /// Resume the latest live session for the pair, or create one with `me` to move first.
    ///
    /// Returns the session and whether it was created by this call.
    pub async fn open_session<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_type: GameType,
        me: ProfileId,
        partner: ProfileId,
    ) -> Result<(Session, bool), DomainError> {
        if me == partner {
            return Err(DomainError::validation(
                ValidationKind::SamePlayer,
                "You cannot start a session with yourself",
            ));
        }
        profiles::require_profile(conn, me).await?;
        profiles::require_profile(conn, partner).await?;

        if let Some(existing) = sessions::find_latest_for_pair(conn, game_type, me, partner).await?
        {
            debug!(session_id = existing.id, me, partner, "Resuming session");
            return Ok((existing, false));
        }

        // The live-pair unique index settles racing opens: the loser inserts
        // nothing and reads back the winner's row.
        let created = sessions::create_if_absent(conn, game_type, me, partner).await?;
        let Some(session) = sessions::find_latest_for_pair(conn, game_type, me, partner).await?
        else {
            return Err(DomainError::conflict(
                ConflictKind::Other("SessionUnavailable".into()),
                "The session for this pair is not readable yet; please retry",
            ));
        };

        if created {
            info!(
                session_id = session.id,
                game_type = ?game_type,
                player_a = me,
                player_b = partner,
                "Session created"
            );
        } else {
            debug!(session_id = session.id, me, partner, "Lost open race; resuming");
        }
        Ok((session, created))
    }

    /// Load a session for a participant. Archived sessions stay readable.
    pub async fn get_session<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: i64,
        viewer: ProfileId,
    ) -> Result<SessionView, DomainError> {
        let session = sessions::require_session(conn, session_id).await?;
        Self::ensure_participant(&session, viewer)?;
        Ok(SessionView::for_viewer(&session, viewer))
    }

    pub async fn list_sessions<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        profile_id: ProfileId,
    ) -> Result<Vec<SessionView>, DomainError> {
        let list = sessions::list_for_profile(conn, profile_id).await?;
        Ok(list
            .iter()
            .map(|s| SessionView::for_viewer(s, profile_id))
            .collect())
    }

    fn ensure_live(session: &Session) -> Result<(), DomainError> {
        if session.is_archived() {
            return Err(DomainError::validation(
                ValidationKind::SessionArchived,
                format!("Session {} was archived; open a new one", session.id),
            ));
        }
        Ok(())
    }

    fn ensure_version(session: &Session, expected: Option<i32>) -> Result<i32, DomainError> {
        let expected = expected.unwrap_or(session.lock_version);
        if expected != session.lock_version {
            return Err(DomainError::optimistic_lock(expected, session.lock_version));
        }
        Ok(expected)
    }

    /// Run the checks a Generate by `actor` must pass, without its inputs.
    ///
    /// Lets callers reject a request before fetching a phrase for it.
    pub async fn ensure_can_generate<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: i64,
        actor: ProfileId,
        expected_lock_version: Option<i32>,
    ) -> Result<(), DomainError> {
        let session = sessions::require_session(conn, session_id).await?;
        Self::ensure_participant(&session, actor)?;
        Self::ensure_live(&session)?;
        Self::ensure_version(&session, expected_lock_version)?;
        let SessionState::EmojiCharades(state) = &session.state;
        turn::ensure_can_generate(state, session.seats, session.turn_owner, actor)
    }

    /// Validate and persist one turn action.
    ///
    /// `expected_lock_version` is the version the client acted on; when omitted
    /// the freshly loaded version is used. The write itself is conditional
    /// on that version, so of two racing actions at most one is stored.
    pub async fn apply_action<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: i64,
        actor: ProfileId,
        expected_lock_version: Option<i32>,
        action: TurnAction,
    ) -> Result<ActionOutcome, DomainError> {
        let session = sessions::require_session(conn, session_id).await?;
        Self::ensure_participant(&session, actor)?;
        Self::ensure_live(&session)?;
        let expected = Self::ensure_version(&session, expected_lock_version)?;

        let action_name = action.name();
        let applied = session
            .state
            .apply(session.seats, session.turn_owner, actor, action)?;

        let updated = sessions::update_session(
            conn,
            session_id,
            expected,
            &applied.state,
            applied.turn_owner,
        )
        .await?;

        let settlement = match applied.reward {
            Some(claim) => Some(
                settlement::settle(
                    conn,
                    RewardGrant {
                        event_key: settlement::session_event_key(session_id, claim.round),
                        profile_id: claim.beneficiary,
                        amount: self.reward_xp,
                    },
                )
                .await?,
            ),
            None => None,
        };

        let SessionState::EmojiCharades(state) = &updated.state;
        info!(
            session_id,
            actor,
            action = action_name,
            phase = ?state.phase.kind(),
            round = state.round_count,
            turn_owner = updated.turn_owner,
            lock_version = updated.lock_version,
            rewarded = settlement.as_ref().is_some_and(SettlementOutcome::is_credited),
            "Session transition applied"
        );

        Ok(ActionOutcome {
            session: updated,
            settlement,
        })
    }

    /// Archive sessions nobody has touched for `idle_for`.
    ///
    /// Returns each archived session with its bumped version so the caller
    /// can notify subscribers once the writes are committed.
    pub async fn archive_idle_sessions<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        idle_for: Duration,
    ) -> Result<Vec<ArchivedSession>, DomainError> {
        let cutoff = OffsetDateTime::now_utc() - idle_for;
        let archived = sessions::archive_idle(conn, cutoff).await?;
        if !archived.is_empty() {
            info!(archived = archived.len(), cutoff = %cutoff, "Archived idle sessions");
        }
        Ok(archived)
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new(CORRECT_GUESS_REWARD_XP)
    }
}
