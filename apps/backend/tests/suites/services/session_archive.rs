use std::time::Duration;

use kinquest_backend::domain::TurnAction;
use kinquest_backend::entities::game_sessions::GameType;
use kinquest_backend::errors::domain::{DomainError, ValidationKind};
use kinquest_backend::infra::sweeper::sweep_idle_sessions;
use kinquest_backend::services::sessions::SessionService;
use kinquest_backend::ws::hub::HubEvent;

use crate::support::{test_state, Family};

#[tokio::test]
async fn recent_sessions_survive_the_sweep() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();
    svc.open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();

    let archived = svc
        .archive_idle_sessions(&state.db, Duration::from_secs(3600))
        .await
        .unwrap();
    assert!(archived.is_empty());
}

#[tokio::test]
async fn idle_sessions_are_archived_readable_and_never_resumed() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();
    let (old, _) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let archived = svc
        .archive_idle_sessions(&state.db, Duration::from_millis(5))
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, old.id);
    assert_eq!(archived[0].lock_version, old.lock_version + 1);

    let view = svc.get_session(&state.db, old.id, fam.son.id).await.unwrap();
    assert!(view.archived);
    assert!(!view.is_my_turn);

    let err = svc
        .apply_action(
            &state.db,
            old.id,
            fam.dad.id,
            None,
            TurnAction::Generate {
                secret_phrase: "Up".into(),
                clue: "🎈".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::SessionArchived, _)));

    let (fresh, created) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.son.id, fam.dad.id)
        .await
        .unwrap();
    assert!(created);
    assert_ne!(fresh.id, old.id);
    assert_eq!(fresh.turn_owner, fam.son.id);

    assert!(svc
        .list_sessions(&state.db, fam.dad.id)
        .await
        .unwrap()
        .iter()
        .all(|s| s.id == fresh.id));
}

#[tokio::test]
async fn sweep_notifies_watchers_of_archived_sessions() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = SessionService::default();
    let (session, _) = svc
        .open_session(&state.db, GameType::EmojiCharades, fam.dad.id, fam.son.id)
        .await
        .unwrap();

    let mut sub = state.hub.subscribe(session.id, fam.son.id);
    tokio::time::sleep(Duration::from_millis(20)).await;
    let archived = sweep_idle_sessions(&state, Duration::from_millis(5))
        .await
        .unwrap();
    assert_eq!(archived, 1);

    let mut updates = Vec::new();
    while let Ok(event) = sub.receiver.try_recv() {
        if matches!(event, HubEvent::SessionUpdated { .. }) {
            updates.push(event);
        }
    }
    assert_eq!(
        updates,
        vec![HubEvent::SessionUpdated {
            session_id: session.id,
            lock_version: session.lock_version + 1,
        }]
    );

    // Nothing left to archive, so a second sweep stays quiet.
    assert_eq!(
        sweep_idle_sessions(&state, Duration::from_millis(5))
            .await
            .unwrap(),
        0
    );
    assert!(sub.receiver.try_recv().is_err());
}
