use crate::domain::turn::{
    apply, ensure_can_generate, CharadesState, RoundPhase, Seats, TurnAction, Verdict,
};
use crate::domain::{PhaseKind, RewardClaim};
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};

const A: i64 = 1;
const B: i64 = 2;

fn seats() -> Seats {
    Seats::new(A, B).unwrap()
}

fn generate(phrase: &str, clue: &str) -> TurnAction {
    TurnAction::Generate {
        secret_phrase: phrase.into(),
        clue: clue.into(),
    }
}

fn guess(text: &str) -> TurnAction {
    TurnAction::Guess { guess: text.into() }
}

fn review(verdict: Verdict) -> TurnAction {
    TurnAction::Review { verdict }
}

fn validation_kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(kind, _) => kind,
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Plays generate + guess from a fresh state where `A` generates.
fn to_reviewing() -> (CharadesState, i64) {
    let start = CharadesState::new();
    let t1 = apply(&start, seats(), A, A, generate("Lion King", "🦁👑")).unwrap();
    let t2 = apply(&t1.state, seats(), t1.turn_owner, B, guess("lion king")).unwrap();
    (t2.state, t2.turn_owner)
}

#[test]
fn generate_moves_to_guessing_and_hands_turn_over() {
    let t = apply(&CharadesState::new(), seats(), A, A, generate("Frozen", "❄️👸")).unwrap();
    assert_eq!(t.turn_owner, B);
    assert_eq!(t.reward, None);
    assert_eq!(
        t.state.phase,
        RoundPhase::Guessing {
            secret_phrase: "Frozen".into(),
            clue: "❄️👸".into()
        }
    );
    assert_eq!(t.state.round_count, 0);
}

#[test]
fn full_cycle_with_approval_swaps_roles_and_rewards_guesser_once() {
    let (reviewing, owner) = to_reviewing();
    assert_eq!(owner, A);
    assert_eq!(reviewing.phase.kind(), PhaseKind::Reviewing);

    let t = apply(&reviewing, seats(), owner, A, review(Verdict::Correct)).unwrap();
    assert_eq!(t.state, CharadesState { round_count: 1, phase: RoundPhase::Generating });
    assert_eq!(t.turn_owner, B);
    assert_eq!(t.reward, Some(RewardClaim { beneficiary: B, round: 0 }));
}

#[test]
fn rejection_advances_round_without_reward_and_swaps_roles() {
    let (reviewing, owner) = to_reviewing();
    let t = apply(&reviewing, seats(), owner, A, review(Verdict::Incorrect)).unwrap();
    assert_eq!(t.state.round_count, 1);
    assert_eq!(t.state.phase, RoundPhase::Generating);
    assert_eq!(t.turn_owner, B);
    assert_eq!(t.reward, None);
}

#[test]
fn give_up_keeps_turn_with_guesser_and_never_rewards() {
    let t1 = apply(&CharadesState::new(), seats(), A, A, generate("Up", "🎈🏠")).unwrap();
    let t2 = apply(&t1.state, seats(), t1.turn_owner, B, TurnAction::GiveUp).unwrap();
    assert_eq!(t2.turn_owner, B);
    assert_eq!(t2.reward, None);
    assert_eq!(t2.state, CharadesState { round_count: 1, phase: RoundPhase::Generating });
}

#[test]
fn inputs_are_trimmed() {
    let t = apply(&CharadesState::new(), seats(), A, A, generate("  Cars ", " 🚗 ")).unwrap();
    assert_eq!(
        t.state.phase,
        RoundPhase::Guessing { secret_phrase: "Cars".into(), clue: "🚗".into() }
    );
}

#[test]
fn blank_inputs_are_rejected() {
    let err = apply(&CharadesState::new(), seats(), A, A, generate("   ", "🚗")).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::EmptyInput);

    let t1 = apply(&CharadesState::new(), seats(), A, A, generate("Cars", "🚗")).unwrap();
    let err = apply(&t1.state, seats(), B, B, guess("\t")).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::EmptyInput);
}

#[test]
fn out_of_turn_actor_is_rejected() {
    let err = apply(&CharadesState::new(), seats(), A, B, generate("Cars", "🚗")).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::OutOfTurn);
}

#[test]
fn outsider_is_rejected_before_turn_check() {
    let err = apply(&CharadesState::new(), seats(), A, 99, generate("Cars", "🚗")).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotAParticipant);
}

#[test]
fn wrong_phase_actions_are_rejected() {
    let err = apply(&CharadesState::new(), seats(), A, A, guess("cars")).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PhaseMismatch);

    let err = apply(&CharadesState::new(), seats(), A, A, TurnAction::GiveUp).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PhaseMismatch);

    let (reviewing, owner) = to_reviewing();
    let err = apply(&reviewing, seats(), owner, owner, TurnAction::GiveUp).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PhaseMismatch);
}

#[test]
fn unseated_turn_owner_is_data_corruption() {
    let err = apply(&CharadesState::new(), seats(), 77, A, generate("Cars", "🚗")).unwrap_err();
    assert!(matches!(err, DomainError::Infra(InfraErrorKind::DataCorruption, _)));
}

#[test]
fn seats_require_two_players() {
    let err = Seats::new(5, 5).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::SamePlayer);
    let s = Seats::new(5, 6).unwrap();
    assert_eq!(s.other(5), Some(6));
    assert_eq!(s.other(7), None);
}

#[test]
fn generate_precheck_matches_apply() {
    let fresh = CharadesState::new();
    assert!(ensure_can_generate(&fresh, seats(), A, A).is_ok());

    let err = ensure_can_generate(&fresh, seats(), A, 99).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotAParticipant);
    let err = ensure_can_generate(&fresh, seats(), A, B).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::OutOfTurn);

    let (reviewing, owner) = to_reviewing();
    let err = ensure_can_generate(&reviewing, seats(), owner, owner).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PhaseMismatch);
}
