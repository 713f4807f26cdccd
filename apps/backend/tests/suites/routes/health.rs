use actix_web::test;
use serde_json::Value;

use crate::support::{create_test_app, test_state};

#[actix_web::test]
async fn root_and_health_respond() {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-trace-id"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body.get("db_error").is_none());
    assert_ne!(body["migrations"], "no_migrations");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn inbound_trace_id_is_echoed() {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-trace-id", "kq-test-trace-0001"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-trace-id").and_then(|v| v.to_str().ok()),
        Some("kq-test-trace-0001")
    );
}
