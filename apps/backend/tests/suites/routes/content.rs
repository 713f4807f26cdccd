use std::sync::Arc;

use actix_web::test;
use async_trait::async_trait;
use kinquest_backend::config::app::AppConfig;
use kinquest_backend::content::{ChallengeIdea, Charade, ContentSource};
use kinquest_backend::entities::missions::MissionOwner;
use serde_json::Value;

use crate::support::{bearer, create_test_app, test_state, test_state_with, Family};

struct FixedContent;

#[async_trait]
impl ContentSource for FixedContent {
    async fn charade(&self) -> Charade {
        Charade {
            phrase: "Jurassic Park".into(),
            emojis: "🦖🏞️".into(),
        }
    }

    async fn challenge(&self) -> ChallengeIdea {
        ChallengeIdea {
            title: "Plank Battle".into(),
            description: "Hold a plank longer than your partner".into(),
            duration: "60s".into(),
            xp: 70,
            owner: MissionOwner::Shared,
            emoji: "💪".into(),
        }
    }
}

#[actix_web::test]
async fn content_comes_from_configured_source() {
    let state = test_state_with(AppConfig::default(), Arc::new(FixedContent)).await;
    Family::seed(&state).await;
    let son = bearer(&state, "son");
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/content/charade")
        .insert_header(son.clone())
        .to_request();
    let charade: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(charade["phrase"], "Jurassic Park");
    assert_eq!(charade["emojis"], "🦖🏞️");

    let req = test::TestRequest::get()
        .uri("/api/content/challenge")
        .insert_header(son)
        .to_request();
    let challenge: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(challenge["title"], "Plank Battle");
    assert_eq!(challenge["xp"], 70);
    assert_eq!(challenge["owner"], "SHARED");
}

#[actix_web::test]
async fn catalog_charade_is_never_empty() {
    let state = test_state().await;
    Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/content/charade")
        .insert_header(dad)
        .to_request();
    let charade: Value = test::call_and_read_body_json(&app, req).await;
    assert!(!charade["phrase"].as_str().unwrap().is_empty());
    assert!(!charade["emojis"].as_str().unwrap().is_empty());
}
