use actix_web::test;
use serde_json::Value;
use tourney::infra::state::build_state;

use crate::support::app_builder::build_test_app;
use crate::support::fixtures::{clock_at, MORNING};

#[actix_web::test]
async fn memory_store_reports_ok() {
    let state = build_state()
        .with_clock(clock_at(MORNING))
        .build()
        .await
        .expect("state");
    let app = build_test_app(state).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["time"], "2024-01-15T08:00:00Z");
    assert!(body["appVersion"].is_string());
    assert!(body.get("migrations").is_none());
}

#[actix_web::test]
async fn sqlite_store_reports_migrations() {
    let state = build_state()
        .with_sqlite_memory()
        .build()
        .await
        .expect("state");
    let app = build_test_app(state).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["store"], "ok");
    assert!(body["migrations"].is_string());
    assert!(body.get("storeError").is_none());
}
