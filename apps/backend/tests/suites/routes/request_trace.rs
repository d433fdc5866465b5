use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use tourney::infra::state::build_state;

use crate::support::app_builder::build_test_app;

#[actix_web::test]
async fn inbound_trace_id_is_echoed_into_errors() {
    let state = build_state().build().await.expect("state");
    let app = build_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/users/ghost")
        .insert_header(("x-trace-id", "client-retry-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-trace-id").and_then(|v| v.to_str().ok()),
        Some("client-retry-42")
    );
    let problem = assert_problem_details_from_service_response(
        resp,
        "USER_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
    assert_eq!(problem.trace_id, "client-retry-42");
}

#[actix_web::test]
async fn unusable_inbound_id_is_replaced() {
    let state = build_state().build().await.expect("state");
    let app = build_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-trace-id", "has spaces; and=junk"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("trace header");
    assert_ne!(id, "has spaces; and=junk");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[actix_web::test]
async fn each_request_gets_its_own_id() {
    let state = build_state().build().await.expect("state");
    let app = build_test_app(state).await;

    let mut seen = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        let id = resp
            .headers()
            .get("x-trace-id")
            .and_then(|v| v.to_str().ok())
            .expect("trace header")
            .to_string();
        assert!(!seen.contains(&id));
        seen.push(id);
    }
}
