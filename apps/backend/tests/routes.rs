mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use backend_test_support::unique_helpers::{unique_event_id, unique_player_id};
use leela_backend::middleware::request_trace::RequestTrace;
use leela_backend::routes;
use leela_backend::state::app_state::AppState;
use leela_backend::workflow::RetryPolicy;
use serde_json::{json, Value};

async fn app_state() -> AppState {
    leela_backend::build_state()
        .in_memory()
        .with_policy(RetryPolicy::immediate(2))
        .build()
        .await
        .expect("in-memory state should build")
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestTrace)
                .app_data(web::Data::new($state))
                .configure(routes::configure),
        )
        .await
    };
}

fn roll_body(player_id: &str, roll: i64) -> Value {
    json!({
        "type": "dice.roll",
        "eventId": unique_event_id(),
        "playerId": player_id,
        "rollValue": roll,
    })
}

#[actix_web::test]
async fn roll_then_read_player() {
    let app = app!(app_state().await);
    let player = unique_player_id();

    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(roll_body(&player, 6))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(resp).await;
    assert_eq!(outcome["kind"], "roll");
    assert_eq!(outcome["state"]["position"], 6);
    assert_eq!(outcome["moveResult"]["transitionKind"], "STEP");
    assert_eq!(outcome["replayed"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{player}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["position"], 6);
    assert_eq!(body["version"], 1);
    assert!(body.get("email").is_none());
}

#[actix_web::test]
async fn out_of_range_roll_is_rejected() {
    let app = app!(app_state().await);
    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(roll_body(&unique_player_id(), 9))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "INVALID_ROLL",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
}

#[actix_web::test]
async fn unknown_event_type_is_a_bad_request() {
    let app = app!(app_state().await);
    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(json!({ "type": "dice.shake", "playerId": "p1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Unknown event type"),
    )
    .await;
}

#[actix_web::test]
async fn second_roll_before_report_is_a_conflict() {
    let state = app_state().await;
    let app = app!(state);
    let player = unique_player_id();

    for roll in [6, 2] {
        let req = test::TestRequest::post()
            .uri("/api/events")
            .set_json(roll_body(&player, roll))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(roll_body(&player, 3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "REPORT_REQUIRED",
        StatusCode::CONFLICT,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(json!({
            "type": "report.submit",
            "playerId": player,
            "planNumber": 8,
            "reportText": "What the snake taught me",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(resp).await;
    assert_eq!(outcome["state"]["needsReport"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{player}/reports"))
        .to_request();
    let reports: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(reports.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn missing_player_is_not_found() {
    let app = app!(app_state().await);
    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{}", unique_player_id()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "PLAYER_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[actix_web::test]
async fn health_reports_in_memory_mode() {
    let app = app!(app_state().await);
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "in_memory");
}
