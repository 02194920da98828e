//! Tests for the order event endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockall::predicate::function;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::{
    FixtureBackfillCommand, MockOrderCreatedHandler, MockOrderUpdatedHandler,
};
use crate::domain::{DispatchOutcome, OrderCreated, OrderStatus, OrderUpdate, SkipReason, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;

fn state(updated: MockOrderUpdatedHandler, created: MockOrderCreatedHandler) -> HttpState {
    HttpState::new(
        Arc::new(FixtureBackfillCommand),
        Arc::new(updated),
        Arc::new(created),
    )
}

async fn post(state: HttpState, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn update_event_reaches_handler() {
    let mut updated = MockOrderUpdatedHandler::new();
    updated
        .expect_on_order_updated()
        .with(function(|update: &OrderUpdate| {
            update.order_id.as_str() == "order-7"
                && update.before.status == Some(OrderStatus::OnTheWay)
                && update.after.status == Some(OrderStatus::Arrived)
                && update.after.user_id == Some(UserId::new("cust-1"))
        }))
        .times(1)
        .returning(|_| DispatchOutcome::Sent {
            delivered: 1,
            attempted: 1,
        });

    let (status, body) = post(
        state(updated, MockOrderCreatedHandler::new()),
        "/events/orders/order-7/updated",
        json!({
            "before": { "status": "on_the_way", "user_id": "cust-1" },
            "after": { "status": "arrived", "user_id": "cust-1" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "outcome": "sent", "delivered": 1, "attempted": 1 })
    );
}

#[rstest]
#[case(DispatchOutcome::Skipped(SkipReason::RecipientNotFound), json!({ "outcome": "skipped", "reason": "recipient_not_found" }))]
#[case(DispatchOutcome::Failed("push transport failed: reset".to_owned()), json!({ "outcome": "failed", "reason": "push transport failed: reset" }))]
#[actix_web::test]
async fn unsent_outcomes_still_answer_ok(#[case] outcome: DispatchOutcome, #[case] expected: Value) {
    let mut updated = MockOrderUpdatedHandler::new();
    updated
        .expect_on_order_updated()
        .times(1)
        .returning(move |_| outcome.clone());

    let (status, body) = post(
        state(updated, MockOrderCreatedHandler::new()),
        "/events/orders/order-7/updated",
        json!({ "before": {}, "after": { "status": "accepted" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);
}

#[rstest]
#[actix_web::test]
async fn create_event_decodes_pickup_date() {
    let mut created = MockOrderCreatedHandler::new();
    created
        .expect_on_order_created()
        .with(function(|event: &OrderCreated| {
            event.order_id.as_str() == "order-9"
                && event.order.status == Some(OrderStatus::Waiting)
                && event
                    .order
                    .pickup_date
                    .is_some_and(|at| at.timestamp() == 1_749_517_200)
        }))
        .times(1)
        .returning(|_| DispatchOutcome::Skipped(SkipReason::NoDriverTokens));

    let (status, body) = post(
        state(MockOrderUpdatedHandler::new(), created),
        "/events/orders/order-9/created",
        json!({ "status": "waiting", "pickup_date": { "_seconds": 1_749_517_200_i64, "_nanoseconds": 0 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outcome": "skipped", "reason": "no_driver_tokens" }));
}

#[rstest]
#[actix_web::test]
async fn invalid_timestamp_is_rejected_before_dispatch() {
    let mut created = MockOrderCreatedHandler::new();
    created.expect_on_order_created().never();

    let (status, body) = post(
        state(MockOrderUpdatedHandler::new(), created),
        "/events/orders/order-9/created",
        json!({ "status": "waiting", "pickup_date": "soon" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "pickup_date");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_invalid_request() {
    let mut updated = MockOrderUpdatedHandler::new();
    updated.expect_on_order_updated().never();

    let (status, body) = post(
        state(updated, MockOrderCreatedHandler::new()),
        "/events/orders/order-7/updated",
        json!({ "after": { "status": "arrived" } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
