use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::{json, Value};
use tourney::infra::state::build_state;

use crate::support::app_builder::build_test_app;
use crate::support::fixtures::{clock_at, MORNING};

#[actix_web::test]
async fn create_fetch_and_level_up() {
    let state = build_state()
        .with_clock(clock_at(MORNING))
        .build()
        .await
        .expect("state");
    let app = build_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "mira", "country": "nl" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["username"], "mira");
    assert_eq!(created["level"], 1);
    assert_eq!(created["coins"], 1000);
    assert_eq!(created["country"], "NL");
    let user_id = created["userId"].as_str().expect("userId").to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/users/{user_id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::put()
        .uri(&format!("/users/{user_id}/progress"))
        .set_json(json!({ "newLevel": 3 }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["level"], 3);
    assert_eq!(updated["coins"], 1200);
}

#[actix_web::test]
async fn player_errors_are_problem_details() {
    let state = build_state().build().await.expect("state");
    let app = build_test_app(state).await;

    let req = test::TestRequest::get().uri("/users/nobody").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "USER_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("nobody"),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_USERNAME",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "x" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let user_id = created["userId"].as_str().expect("userId");

    let req = test::TestRequest::put()
        .uri(&format!("/users/{user_id}/progress"))
        .set_json(json!({ "newLevel": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_LEVEL_INCREASE",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;
}
