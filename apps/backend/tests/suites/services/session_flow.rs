use kinquest_backend::domain::{PhaseKind, RoundPhase, SessionState, TurnAction, Verdict};
use kinquest_backend::entities::game_sessions::GameType;
use kinquest_backend::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use kinquest_backend::repos::{profiles, rewards};
use kinquest_backend::services::sessions::{SessionService, SessionView};
use kinquest_backend::services::settlement::{session_event_key, SettlementOutcome};

use crate::support::{test_state, Family};

fn generate(phrase: &str, clue: &str) -> TurnAction {
    TurnAction::Generate {
        secret_phrase: phrase.to_string(),
        clue: clue.to_string(),
    }
}

fn guess(text: &str) -> TurnAction {
    TurnAction::Guess {
        guess: text.to_string(),
    }
}

fn phase_of(view: &SessionView) -> PhaseKind {
    view.phase
}

#[tokio::test]
async fn open_starts_with_creator_generating() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();

    let (session, created) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();

    assert!(created);
    assert_eq!(session.turn_owner, fam.dad.id);
    assert_eq!(session.lock_version, 1);
    let SessionState::EmojiCharades(charades) = &session.state;
    assert_eq!(charades.round_count, 0);
    assert_eq!(charades.phase, RoundPhase::Generating);
}

#[tokio::test]
async fn approve_cycle_rewards_guesser_and_swaps_roles() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::new(50);
    let (session, _) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();
    let id = session.id;

    let out = svc
        .apply_action(&state.db, id, fam.dad.id, Some(1), generate(" The Lion King ", "🦁👑"))
        .await
        .unwrap();
    assert_eq!(out.session.turn_owner, fam.son.id);
    assert_eq!(out.session.lock_version, 2);
    assert!(out.settlement.is_none());

    // The guesser sees the clue but not the answer.
    let son_view = svc.get_session(&state.db, id, fam.son.id).await.unwrap();
    assert_eq!(phase_of(&son_view), PhaseKind::Guessing);
    assert!(son_view.is_my_turn);
    assert_eq!(son_view.secret_phrase, None);
    assert_eq!(son_view.clue.as_deref(), Some("🦁👑"));
    let dad_view = svc.get_session(&state.db, id, fam.dad.id).await.unwrap();
    assert_eq!(dad_view.secret_phrase.as_deref(), Some("The Lion King"));
    assert!(!dad_view.is_my_turn);

    let out = svc
        .apply_action(&state.db, id, fam.son.id, Some(2), guess("lion king"))
        .await
        .unwrap();
    assert_eq!(out.session.turn_owner, fam.dad.id);

    let out = svc
        .apply_action(
            &state.db,
            id,
            fam.dad.id,
            Some(3),
            TurnAction::Review {
                verdict: Verdict::Correct,
            },
        )
        .await
        .unwrap();

    assert_eq!(out.session.turn_owner, fam.son.id, "guesser generates next");
    let SessionState::EmojiCharades(charades) = &out.session.state;
    assert_eq!(charades.round_count, 1);
    assert_eq!(charades.phase, RoundPhase::Generating);
    match out.settlement {
        Some(SettlementOutcome::Credited {
            profile_id, amount, ..
        }) => {
            assert_eq!(profile_id, fam.son.id);
            assert_eq!(amount, 50);
        }
        other => panic!("expected credit, got {other:?}"),
    }

    let son = profiles::require_profile(&state.db, fam.son.id).await.unwrap();
    assert_eq!(son.xp, 50);
    let dad = profiles::require_profile(&state.db, fam.dad.id).await.unwrap();
    assert_eq!(dad.xp, 0);
    assert!(rewards::find_by_event_key(&state.db, &session_event_key(id, 0))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn reject_cycle_swaps_roles_without_reward() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();
    let (session, _) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();
    let id = session.id;

    svc.apply_action(&state.db, id, fam.dad.id, None, generate("Cars", "🚗⚡"))
        .await
        .unwrap();
    svc.apply_action(&state.db, id, fam.son.id, None, guess("Lightning"))
        .await
        .unwrap();
    let out = svc
        .apply_action(
            &state.db,
            id,
            fam.dad.id,
            None,
            TurnAction::Review {
                verdict: Verdict::Incorrect,
            },
        )
        .await
        .unwrap();

    assert!(out.settlement.is_none());
    assert_eq!(out.session.turn_owner, fam.son.id);
    let SessionState::EmojiCharades(charades) = &out.session.state;
    assert_eq!(charades.round_count, 1);
    assert!(rewards::list_for_profile(&state.db, fam.son.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn give_up_keeps_guesser_as_next_generator() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();
    let (session, _) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();

    svc.apply_action(&state.db, session.id, fam.dad.id, None, generate("Up", "🎈🏠"))
        .await
        .unwrap();
    let out = svc
        .apply_action(&state.db, session.id, fam.son.id, None, TurnAction::GiveUp)
        .await
        .unwrap();

    assert_eq!(out.session.turn_owner, fam.son.id);
    assert!(out.settlement.is_none());
    let SessionState::EmojiCharades(charades) = &out.session.state;
    assert_eq!(charades.round_count, 1);
    assert_eq!(charades.phase, RoundPhase::Generating);
}

#[tokio::test]
async fn rule_violations_leave_session_untouched() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();
    let (session, _) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();
    let id = session.id;

    let err = svc
        .apply_action(&state.db, id, fam.son.id, None, generate("Frozen", "❄️"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::OutOfTurn, _)));

    let err = svc
        .apply_action(&state.db, id, fam.mum.id, None, generate("Frozen", "❄️"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::NotAParticipant, _)));

    let err = svc
        .apply_action(&state.db, id, fam.dad.id, None, guess("early"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::PhaseMismatch, _)));

    let err = svc
        .apply_action(&state.db, id, fam.dad.id, None, generate("   ", "❄️"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::EmptyInput, _)));

    let err = svc
        .get_session(&state.db, id, fam.mum.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::NotAParticipant, _)));

    let view = svc.get_session(&state.db, id, fam.dad.id).await.unwrap();
    assert_eq!(view.lock_version, 1);
    assert_eq!(view.phase, PhaseKind::Generating);
}

#[tokio::test]
async fn open_resumes_latest_session_for_unordered_pair() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();

    let (first, created) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();
    assert!(created);

    let (again, created) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.son.id, fam.dad.id)
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(again.id, first.id);
    // Resuming never changes whose turn it is.
    assert_eq!(again.turn_owner, fam.dad.id);

    let (other, created) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.mum.id)
        .await
        .unwrap();
    assert!(created);
    assert_ne!(other.id, first.id);

    let dad_sessions = svc.list_sessions(&state.db, fam.dad.id).await.unwrap();
    assert_eq!(dad_sessions.len(), 2);
    let son_sessions = svc.list_sessions(&state.db, fam.son.id).await.unwrap();
    assert_eq!(son_sessions.len(), 1);
}

#[tokio::test]
async fn open_validates_pair() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();

    let err = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.dad.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::SamePlayer, _)));

    let err = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, 9_999)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Profile, _)));

    let err = svc.get_session(&state.db, 4_242, fam.dad.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Session, _)));
}
