use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::{json, Value};
use tourney::infra::state::build_state;

use crate::support::app_builder::build_test_app;
use crate::support::fixtures::{clock_at, player, seed_eligible, seed_player, MORNING, TODAY};

#[actix_web::test]
async fn player_boards_are_ranked_rows() {
    let state = build_state().build().await.expect("state");
    let top = seed_player(state.store.as_ref(), player(50, 0, Some("TR"))).await;
    seed_player(state.store.as_ref(), player(20, 0, Some("DE"))).await;
    seed_player(state.store.as_ref(), player(5, 0, Some("TR"))).await;
    let app = build_test_app(state).await;

    let req = test::TestRequest::get().uri("/leaderboard/global").to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["userId"], top.id.as_str());
    assert_eq!(rows[0]["level"], 50);
    assert_eq!(rows[2]["rank"], 3);

    let req = test::TestRequest::get()
        .uri("/leaderboard/country?country=tr")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["country"] == "TR"));

    let req = test::TestRequest::get()
        .uri("/leaderboard/country?country=turkey")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_COUNTRY",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;

    let req = test::TestRequest::get().uri("/leaderboard/country").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_PARAMETER",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
}

#[actix_web::test]
async fn group_board_lists_scores() {
    let state = build_state()
        .with_clock(clock_at(MORNING))
        .build()
        .await
        .expect("state");
    let players = seed_eligible(state.store.as_ref(), 2).await;
    let app = build_test_app(state).await;

    let req = test::TestRequest::post().uri("/tournaments/start").to_request();
    test::call_service(&app, req).await;
    for p in &players {
        let req = test::TestRequest::post()
            .uri("/tournaments/enter")
            .set_json(json!({ "userId": p.id, "tournamentId": TODAY }))
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = test::TestRequest::put()
        .uri(&format!("/tournaments/{TODAY}/score"))
        .set_json(json!({ "userId": players[1].id, "increment": 9 }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/leaderboard/tournament?groupId=2024-01-15-group-1")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["userId"], players[1].id.as_str());
    assert_eq!(rows[0]["score"], 9);
    assert_eq!(rows[0]["groupId"], "2024-01-15-group-1");
    assert_eq!(rows[1]["rank"], 2);
}
