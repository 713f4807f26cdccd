//! Generate → guess → review cycle for two-seat sessions.
//!
//! `apply` is the single authority for who may act and what the session
//! looks like afterwards. Callers persist the returned `Transition` with a
//! conditional write so two racing actors cannot both win.

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};

pub type ProfileId = i64;

/// The two participants of a session, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seats {
    pub player_a: ProfileId,
    pub player_b: ProfileId,
}

impl Seats {
    pub fn new(player_a: ProfileId, player_b: ProfileId) -> Result<Self, DomainError> {
        if player_a == player_b {
            return Err(DomainError::validation(
                ValidationKind::SamePlayer,
                "A session needs two different players",
            ));
        }
        Ok(Self { player_a, player_b })
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        id == self.player_a || id == self.player_b
    }

    /// The opposite seat, or `None` when `id` is not seated.
    pub fn other(&self, id: ProfileId) -> Option<ProfileId> {
        if id == self.player_a {
            Some(self.player_b)
        } else if id == self.player_b {
            Some(self.player_a)
        } else {
            None
        }
    }
}

/// Phase of the current round. Secrets live only in the phases that need them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RoundPhase {
    Generating,
    Guessing {
        secret_phrase: String,
        clue: String,
    },
    Reviewing {
        secret_phrase: String,
        clue: String,
        current_guess: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Generating,
    Guessing,
    Reviewing,
}

impl RoundPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            RoundPhase::Generating => PhaseKind::Generating,
            RoundPhase::Guessing { .. } => PhaseKind::Guessing,
            RoundPhase::Reviewing { .. } => PhaseKind::Reviewing,
        }
    }
}

/// Emoji-charades payload stored in `game_sessions.state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharadesState {
    pub round_count: u32,
    #[serde(flatten)]
    pub phase: RoundPhase,
}

impl CharadesState {
    pub fn new() -> Self {
        Self {
            round_count: 0,
            phase: RoundPhase::Generating,
        }
    }
}

impl Default for CharadesState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnAction {
    Generate { secret_phrase: String, clue: String },
    Guess { guess: String },
    /// Guesser abandons the round; never rewarded.
    GiveUp,
    Review { verdict: Verdict },
}

impl TurnAction {
    pub fn name(&self) -> &'static str {
        match self {
            TurnAction::Generate { .. } => "generate",
            TurnAction::Guess { .. } => "guess",
            TurnAction::GiveUp => "give_up",
            TurnAction::Review { .. } => "review",
        }
    }
}

/// Reward owed to `beneficiary` for the cycle numbered `round`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardClaim {
    pub beneficiary: ProfileId,
    pub round: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: CharadesState,
    pub turn_owner: ProfileId,
    pub reward: Option<RewardClaim>,
}

fn non_empty(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyInput,
            format!("{field} must not be empty"),
        ));
    }
    Ok(trimmed.to_string())
}

fn next_round(round_count: u32) -> Result<u32, DomainError> {
    round_count.checked_add(1).ok_or_else(|| {
        DomainError::infra(InfraErrorKind::DataCorruption, "Round counter overflow")
    })
}

/// Check that `actor` is seated and owns the turn; returns their partner.
pub fn ensure_turn(
    seats: Seats,
    turn_owner: ProfileId,
    actor: ProfileId,
) -> Result<ProfileId, DomainError> {
    let Some(partner) = seats.other(actor) else {
        return Err(DomainError::validation(
            ValidationKind::NotAParticipant,
            "Only the two session players may act",
        ));
    };
    if !seats.contains(turn_owner) {
        return Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Turn owner {turn_owner} is not seated in this session"),
        ));
    }
    if actor != turn_owner {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "It is the other player's turn",
        ));
    }
    Ok(partner)
}

fn phase_mismatch(phase: PhaseKind, action: &str) -> DomainError {
    DomainError::validation(
        ValidationKind::PhaseMismatch,
        format!("Action '{action}' is not allowed while {phase:?}"),
    )
}

/// Everything `apply` would check for a Generate, without its inputs.
pub fn ensure_can_generate(
    state: &CharadesState,
    seats: Seats,
    turn_owner: ProfileId,
    actor: ProfileId,
) -> Result<(), DomainError> {
    ensure_turn(seats, turn_owner, actor)?;
    match state.phase {
        RoundPhase::Generating => Ok(()),
        ref phase => Err(phase_mismatch(phase.kind(), "generate")),
    }
}

/// Apply `action` by `actor` to a session and return the resulting state.
pub fn apply(
    state: &CharadesState,
    seats: Seats,
    turn_owner: ProfileId,
    actor: ProfileId,
    action: TurnAction,
) -> Result<Transition, DomainError> {
    let partner = ensure_turn(seats, turn_owner, actor)?;

    match (&state.phase, action) {
        (RoundPhase::Generating, TurnAction::Generate { secret_phrase, clue }) => {
            let secret_phrase = non_empty("Secret phrase", secret_phrase)?;
            let clue = non_empty("Clue", clue)?;
            Ok(Transition {
                state: CharadesState {
                    round_count: state.round_count,
                    phase: RoundPhase::Guessing { secret_phrase, clue },
                },
                turn_owner: partner,
                reward: None,
            })
        }
        (RoundPhase::Guessing { secret_phrase, clue }, TurnAction::Guess { guess }) => {
            let current_guess = non_empty("Guess", guess)?;
            Ok(Transition {
                state: CharadesState {
                    round_count: state.round_count,
                    phase: RoundPhase::Reviewing {
                        secret_phrase: secret_phrase.clone(),
                        clue: clue.clone(),
                        current_guess,
                    },
                },
                turn_owner: partner,
                reward: None,
            })
        }
        // The guesser keeps the turn and generates next.
        (RoundPhase::Guessing { .. }, TurnAction::GiveUp) => Ok(Transition {
            state: CharadesState {
                round_count: next_round(state.round_count)?,
                phase: RoundPhase::Generating,
            },
            turn_owner: actor,
            reward: None,
        }),
        (RoundPhase::Reviewing { .. }, TurnAction::Review { verdict }) => {
            let reward = (verdict == Verdict::Correct).then_some(RewardClaim {
                beneficiary: partner,
                round: state.round_count,
            });
            Ok(Transition {
                state: CharadesState {
                    round_count: next_round(state.round_count)?,
                    phase: RoundPhase::Generating,
                },
                turn_owner: partner,
                reward,
            })
        }
        (phase, action) => Err(phase_mismatch(phase.kind(), action.name())),
    }
}
