use std::sync::Arc;

use actix_web::test;
use kinquest_backend::config::app::AppConfig;
use kinquest_backend::content::FallbackCatalog;
use kinquest_backend::verify_access_token;
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::{create_test_app, test_state, test_state_with};

#[actix_web::test]
async fn dev_token_is_hidden_unless_enabled() {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/dev-token")
        .set_json(json!({ "sub": "dad" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 404, "NOT_FOUND").await;
}

#[actix_web::test]
async fn dev_token_mints_verifiable_token() {
    let config = AppConfig {
        dev_tokens: true,
        ..AppConfig::default()
    };
    let state = test_state_with(config, Arc::new(FallbackCatalog::new())).await;
    let security = state.security.clone();
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/dev-token")
        .set_json(json!({ "sub": "son" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let token = body["token"].as_str().unwrap();
    let claims = verify_access_token(token, &security).unwrap();
    assert_eq!(claims.sub, "son");
    assert_eq!(body["expiresIn"], security.token_ttl_secs);

    let req = test::TestRequest::post()
        .uri("/api/auth/dev-token")
        .set_json(json!({ "sub": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "EMPTY_INPUT").await;
}

#[actix_web::test]
async fn bad_tokens_are_unauthorized() {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/api/profiles/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("www-authenticate").and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
    assert_problem(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;

    let req = test::TestRequest::get()
        .uri("/api/profiles/me")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;
}
