use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::test;
use async_trait::async_trait;
use kinquest_backend::config::app::AppConfig;
use kinquest_backend::content::{ChallengeIdea, Charade, ContentSource, FallbackCatalog};
use kinquest_backend::ws::HubEvent;
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::{bearer, create_test_app, test_state, test_state_with, Family};

/// Catalog content that counts how often a charade was requested.
#[derive(Default)]
struct CountingContent {
    charades: AtomicUsize,
}

#[async_trait]
impl ContentSource for CountingContent {
    async fn charade(&self) -> Charade {
        self.charades.fetch_add(1, Ordering::SeqCst);
        FallbackCatalog.charade().await
    }

    async fn challenge(&self) -> ChallengeIdea {
        FallbackCatalog.challenge().await
    }
}

fn etag_of(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get("etag")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("ETag header")
}

#[actix_web::test]
async fn open_resume_and_conditional_get() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let son = bearer(&state, "son");
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(dad.clone())
        .set_json(json!({ "partnerId": fam.son.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let etag = etag_of(&resp);
    let session: Value = test::read_body_json(resp).await;
    let id = session["id"].as_i64().unwrap();
    assert_eq!(etag, format!("\"s{id}-v1\""));
    assert_eq!(session["phase"], "generating");
    assert_eq!(session["isMyTurn"], true);
    assert_eq!(session["gameType"], "EMOJI_CHARADES");

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(son.clone())
        .set_json(json!({ "partnerId": fam.dad.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let resumed: Value = test::read_body_json(resp).await;
    assert_eq!(resumed["id"], id);
    assert_eq!(resumed["isMyTurn"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{id}"))
        .insert_header(son.clone())
        .insert_header(("If-None-Match", etag.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 304);

    let req = test::TestRequest::get()
        .uri("/api/sessions")
        .insert_header(son)
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn open_rejects_self_and_unknown_partner() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(dad.clone())
        .set_json(json!({ "partnerId": fam.dad.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "SAME_PLAYER").await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(dad)
        .set_json(json!({ "partnerId": 9_999 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 404, "PROFILE_NOT_FOUND").await;
}

#[actix_web::test]
async fn full_round_over_http_publishes_updates() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let son = bearer(&state, "son");
    let hub = state.hub.clone();
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(dad.clone())
        .set_json(json!({ "partnerId": fam.son.id }))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    let id = session["id"].as_i64().unwrap();
    let mut sub = hub.subscribe(id, fam.son.id);

    // Phrase and clue omitted: the server picks a charade.
    let if_match = format!("\"s{id}-v1\"");
    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/actions"))
        .insert_header(dad.clone())
        .insert_header(("If-Match", if_match.as_str()))
        .set_json(json!({ "action": { "type": "generate" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(etag_of(&resp), format!("\"s{id}-v2\""));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["session"]["phase"], "guessing");
    assert!(!body["session"]["secretPhrase"].as_str().unwrap().is_empty());
    assert!(!body["session"]["clue"].as_str().unwrap().is_empty());

    let mut saw_update = false;
    while let Ok(event) = sub.receiver.try_recv() {
        if event
            == (HubEvent::SessionUpdated {
                session_id: id,
                lock_version: 2,
            })
        {
            saw_update = true;
        }
    }
    assert!(saw_update, "hub should announce version 2");

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/actions"))
        .insert_header(son.clone())
        .set_json(json!({ "lockVersion": 2, "action": { "type": "guess", "guess": "a film" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/actions"))
        .insert_header(dad)
        .set_json(json!({ "lockVersion": 3, "action": { "type": "review", "verdict": "correct" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["session"]["roundCount"], 1);
    assert_eq!(body["settlement"]["status"], "credited");
    assert_eq!(body["settlement"]["profileId"], fam.son.id);

    let req = test::TestRequest::get()
        .uri("/api/profiles/me/rewards")
        .insert_header(son)
        .to_request();
    let grants: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(grants[0]["eventKey"], format!("session:{id}:round:0"));
}

#[actix_web::test]
async fn action_errors_map_to_problem_details() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let son = bearer(&state, "son");
    let mum = bearer(&state, "mum");
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(dad.clone())
        .set_json(json!({ "partnerId": fam.son.id }))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    let id = session["id"].as_i64().unwrap();
    let uri = format!("/api/sessions/{id}/actions");
    let generate = json!({ "action": { "type": "generate", "secretPhrase": "Up", "clue": "🎈" } });

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(son)
        .set_json(generate.clone())
        .to_request();
    assert_problem(test::call_service(&app, req).await, 422, "OUT_OF_TURN").await;

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(mum.clone())
        .set_json(generate.clone())
        .to_request();
    assert_problem(test::call_service(&app, req).await, 403, "NOT_A_PARTICIPANT").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{id}"))
        .insert_header(mum)
        .to_request();
    assert_problem(test::call_service(&app, req).await, 403, "NOT_A_PARTICIPANT").await;

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(dad.clone())
        .set_json(json!({ "action": { "type": "guess", "guess": "too early" } }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 422, "PHASE_MISMATCH").await;

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(dad.clone())
        .set_json(json!({ "lockVersion": 7, "action": generate["action"].clone() }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 409, "OPTIMISTIC_LOCK").await;

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(dad.clone())
        .insert_header(("If-Match", "\"s1-v2\""))
        .set_json(json!({ "lockVersion": 1, "action": generate["action"].clone() }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 400, "INVALID_HEADER").await;

    let req = test::TestRequest::get()
        .uri("/api/sessions/not-a-number")
        .insert_header(dad.clone())
        .to_request();
    assert_problem(test::call_service(&app, req).await, 400, "INVALID_SESSION_ID").await;

    let req = test::TestRequest::get()
        .uri("/api/sessions/424242")
        .insert_header(dad)
        .to_request();
    assert_problem(test::call_service(&app, req).await, 404, "SESSION_NOT_FOUND").await;
}

#[actix_web::test]
async fn rejected_generate_never_asks_for_a_charade() {
    let content = Arc::new(CountingContent::default());
    let state = test_state_with(AppConfig::default(), content.clone()).await;
    let fam = Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let son = bearer(&state, "son");
    let mum = bearer(&state, "mum");
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(dad.clone())
        .set_json(json!({ "partnerId": fam.son.id }))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/sessions/{}/actions", session["id"]);
    let generate = json!({ "action": { "type": "generate" } });

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(mum)
        .set_json(generate.clone())
        .to_request();
    assert_problem(test::call_service(&app, req).await, 403, "NOT_A_PARTICIPANT").await;

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(son)
        .set_json(generate.clone())
        .to_request();
    assert_problem(test::call_service(&app, req).await, 422, "OUT_OF_TURN").await;

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(dad.clone())
        .set_json(json!({ "lockVersion": 9, "action": generate["action"].clone() }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 409, "OPTIMISTIC_LOCK").await;
    assert_eq!(content.charades.load(Ordering::SeqCst), 0);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(dad.clone())
        .set_json(generate.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(content.charades.load(Ordering::SeqCst), 1);

    // The turn has passed to the son, so a repeat Generate is refused up front.
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(dad)
        .set_json(generate)
        .to_request();
    assert_problem(test::call_service(&app, req).await, 422, "OUT_OF_TURN").await;
    assert_eq!(content.charades.load(Ordering::SeqCst), 1);
}
