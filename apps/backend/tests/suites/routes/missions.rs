use actix_web::test;
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::{bearer, create_test_app, test_state, Family};

fn new_mission(xp: i64) -> Value {
    json!({
        "title": "Wash the car",
        "description": "Including the hubcaps",
        "duration": "45 min",
        "xp": xp,
        "owner": "SON",
        "emoji": "🚗"
    })
}

#[actix_web::test]
async fn mission_lifecycle_over_http() {
    let state = test_state().await;
    let fam = Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let son = bearer(&state, "son");
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/missions")
        .insert_header(dad.clone())
        .set_json(new_mission(80))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let mission: Value = test::read_body_json(resp).await;
    let id = mission["id"].as_i64().unwrap();
    assert_eq!(mission["status"], "ACTIVE");

    let req = test::TestRequest::post()
        .uri(&format!("/api/missions/{id}/proof"))
        .insert_header(son.clone())
        .set_json(json!({
            "proofUrl": "https://photos.test/car.jpg",
            "lockVersion": mission["lockVersion"]
        }))
        .to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending["status"], "PENDING_APPROVAL");
    assert_eq!(pending["submittedBy"], fam.son.id);

    let req = test::TestRequest::post()
        .uri(&format!("/api/missions/{id}/approve"))
        .insert_header(son.clone())
        .set_json(json!({}))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 403, "INSUFFICIENT_ROLE").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/missions/{id}/approve"))
        .insert_header(dad.clone())
        .set_json(json!({ "lockVersion": pending["lockVersion"] }))
        .to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(approved["mission"]["status"], "COMPLETED");
    assert_eq!(approved["settlement"]["amount"], 80);

    let req = test::TestRequest::post()
        .uri(&format!("/api/missions/{id}/reject"))
        .insert_header(dad.clone())
        .set_json(json!({}))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 422, "INVALID_MISSION_STATUS").await;

    let req = test::TestRequest::get()
        .uri("/api/missions/completed")
        .insert_header(son.clone())
        .to_request();
    let done: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(done.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri("/api/missions")
        .insert_header(son.clone())
        .to_request();
    let open: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(open.as_array().map(Vec::len), Some(0));

    let req = test::TestRequest::get()
        .uri("/api/profiles/me")
        .insert_header(son)
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["xp"], 80);
}

#[actix_web::test]
async fn mission_input_errors() {
    let state = test_state().await;
    Family::seed(&state).await;
    let dad = bearer(&state, "dad");
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/missions")
        .insert_header(dad.clone())
        .set_json(new_mission(5_000))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 400, "INVALID_AMOUNT").await;

    let req = test::TestRequest::post()
        .uri("/api/missions/abc/proof")
        .insert_header(dad.clone())
        .set_json(json!({ "proofUrl": "https://photos.test/x.jpg" }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 400, "BAD_REQUEST").await;

    let req = test::TestRequest::post()
        .uri("/api/missions/31337/proof")
        .insert_header(dad)
        .set_json(json!({ "proofUrl": "https://photos.test/x.jpg" }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 404, "MISSION_NOT_FOUND").await;
}
