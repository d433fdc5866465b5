use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use tourney::infra::state::build_state;

use crate::support::app_builder::build_test_app;

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let state = build_state().build().await.expect("state");
    let app = build_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/tournaments/enter")
        .insert_header(ContentType::json())
        .set_payload("{\"userId\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Invalid JSON body"),
    )
    .await;
    assert_eq!(problem.type_, "https://tourney.dev/errors/BAD_REQUEST");
    assert!(!problem.retryable);
}

#[actix_web::test]
async fn missing_field_is_bad_request() {
    let state = build_state().build().await.expect("state");
    let app = build_test_app(state).await;

    let req = test::TestRequest::put()
        .uri("/users/someone/progress")
        .set_json(serde_json::json!({ "level": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("newLevel"),
    )
    .await;
}
