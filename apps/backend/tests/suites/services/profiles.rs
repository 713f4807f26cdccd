use kinquest_backend::entities::profiles::FamilyRole;
use kinquest_backend::errors::domain::{DomainError, ValidationKind};
use kinquest_backend::repos::profiles as profiles_repo;
use kinquest_backend::services::profiles::ProfileService;
use kinquest_backend::services::settlement::{settle, RewardGrant};

use crate::support::{test_state, Family};

#[tokio::test]
async fn ensure_profile_creates_once() {
    let state = test_state().await;
    let svc = ProfileService::new();

    let (created, was_created) = svc
        .ensure_profile(&state.db, "auth0|dad", "  Dad  ", FamilyRole::Dad)
        .await
        .unwrap();
    assert!(was_created);
    assert_eq!(created.display_name, "Dad");
    assert_eq!(created.xp, 0);
    assert_eq!(created.level, 1);

    // A second login with different details returns the stored row untouched.
    let (again, was_created) = svc
        .ensure_profile(&state.db, "auth0|dad", "Someone else", FamilyRole::Son)
        .await
        .unwrap();
    assert!(!was_created);
    assert_eq!(again.id, created.id);
    assert_eq!(again.role, FamilyRole::Dad);

    assert_eq!(profiles_repo::list_profiles(&state.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_display_name_is_rejected() {
    let state = test_state().await;

    let err = ProfileService::new()
        .ensure_profile(&state.db, "auth0|kid", "   ", FamilyRole::Son)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::EmptyInput, _)));
    assert!(profiles_repo::find_by_user_key(&state.db, "auth0|kid")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn season_reset_is_for_parents() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let svc = ProfileService::new();

    settle(
        &state.db,
        RewardGrant {
            event_key: "mission:1".into(),
            profile_id: fam.son.id,
            amount: 600,
        },
    )
    .await
    .unwrap();

    let err = svc.reset_season(&state.db, &fam.son).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InsufficientRole, _)));
    let son = profiles_repo::require_profile(&state.db, fam.son.id).await.unwrap();
    assert_eq!(son.xp, 600);
    assert_eq!(son.level, 2);

    let reset = svc.reset_season(&state.db, &fam.mum).await.unwrap();
    assert_eq!(reset, 3);
    let son = profiles_repo::require_profile(&state.db, fam.son.id).await.unwrap();
    assert_eq!(son.xp, 0);
    assert_eq!(son.level, 1);
}
