use kinquest_backend::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use kinquest_backend::repos::{profiles, rewards};
use kinquest_backend::services::settlement::{settle, RewardGrant, SettlementOutcome};

use crate::support::{test_state, Family};

fn grant(key: &str, profile_id: i64, amount: i64) -> RewardGrant {
    RewardGrant {
        event_key: key.to_string(),
        profile_id,
        amount,
    }
}

#[tokio::test]
async fn same_event_is_credited_once() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;

    let first = settle(&state.db, grant("session:1:round:0", fam.son.id, 50))
        .await
        .unwrap();
    assert!(first.is_credited());

    let replay = settle(&state.db, grant("session:1:round:0", fam.son.id, 50))
        .await
        .unwrap();
    assert_eq!(
        replay,
        SettlementOutcome::AlreadySettled {
            event_key: "session:1:round:0".into()
        }
    );

    let son = profiles::require_profile(&state.db, fam.son.id).await.unwrap();
    assert_eq!(son.xp, 50);
    assert_eq!(rewards::list_for_profile(&state.db, fam.son.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn distinct_events_accumulate_and_level_up() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;

    settle(&state.db, grant("mission:1", fam.dad.id, 450))
        .await
        .unwrap();
    let outcome = settle(&state.db, grant("mission:2", fam.dad.id, 100))
        .await
        .unwrap();

    match outcome {
        SettlementOutcome::Credited {
            new_xp,
            new_level,
            leveled_up,
            ..
        } => {
            assert_eq!(new_xp, 550);
            assert_eq!(new_level, 2);
            assert!(leveled_up);
        }
        other => panic!("expected credit, got {other:?}"),
    }
    let dad = profiles::require_profile(&state.db, fam.dad.id).await.unwrap();
    assert_eq!(dad.level, 2);
}

#[tokio::test]
async fn non_positive_amounts_are_rejected_before_claiming() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;

    for amount in [0, -5] {
        let err = settle(&state.db, grant("mission:9", fam.son.id, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidAmount, _)));
    }
    assert!(rewards::find_by_event_key(&state.db, "mission:9")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let state = test_state().await;

    let err = settle(&state.db, grant("mission:3", 777, 10))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Profile, _) | DomainError::Validation(..)
    ));
}
