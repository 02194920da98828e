//! Tests for server bootstrap and adapter fallback.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use chrono::{TimeZone, Utc};
use pickup_backend::domain::ports::PushMessenger;
use pickup_backend::test_support::{MutableClock, RecordingPushMessenger};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

#[fixture]
fn config() -> ServerConfig {
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("loopback address");
    ServerConfig::new(addr)
}

fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2025, 6, 10, 5, 0, 0)
            .single()
            .expect("valid fixed time"),
    ))
}

#[rstest]
#[actix_web::test]
async fn create_server_marks_ready(config: ServerConfig) {
    let health_state = web::Data::new(build_health_state(&config));
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(health_state.clone(), config).expect("server binds");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_web::test]
async fn backfill_without_database_reports_failure(config: ServerConfig) {
    let app = test::init_service(build_app(
        web::Data::new(HealthState::new()),
        build_http_state(&config, clock()),
    ))
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/backfill/completed-at")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "ok": false,
            "error": "backfill store connection failed: no database configured"
        })
    );
}

#[rstest]
#[actix_web::test]
async fn broadcast_without_database_reports_failure(config: ServerConfig) {
    let messenger = Arc::new(RecordingPushMessenger::new());
    let shared: Arc<dyn PushMessenger> = messenger.clone();
    let app = test::init_service(build_app(
        web::Data::new(HealthState::new()),
        build_http_state(&config.with_messenger(shared), clock()),
    ))
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/events/orders/order-1/created")
            .set_json(json!({ "status": "pending", "pickup_date": "2025-06-10T05:00:00Z" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "outcome": "failed",
            "reason": "user directory connection failed: no database configured"
        })
    );
    assert!(messenger.sent().is_empty());
}

#[rstest]
#[actix_web::test]
async fn not_ready_before_server_starts(config: ServerConfig) {
    let app = test::init_service(build_app(
        web::Data::new(build_health_state(&config)),
        build_http_state(&config, clock()),
    ))
    .await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}
