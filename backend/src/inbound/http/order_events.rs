//! Order change event endpoints.
//!
//! The event source POSTs each order mutation here. Reactions never fail the
//! event: once the body decodes, the response is always 200 carrying the
//! dispatch outcome, so the source does not redeliver.

use actix_web::{post, web};
use tracing::info;

use crate::domain::{OrderCreated, OrderId, OrderUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::order_events_dto::{
    DispatchResponseBody, OrderDocumentDto, OrderUpdatedBody,
};
use crate::inbound::http::state::HttpState;

/// React to an order update by notifying the customer or driver.
#[utoipa::path(
    post,
    path = "/events/orders/{order_id}/updated",
    params(("order_id" = String, Path, description = "Order document identifier")),
    request_body = OrderUpdatedBody,
    responses(
        (status = 200, description = "Event handled", body = DispatchResponseBody),
        (status = 400, description = "Undecodable event", body = crate::domain::Error)
    ),
    tags = ["events"],
    operation_id = "orderUpdated"
)]
#[post("/events/orders/{order_id}/updated")]
pub async fn order_updated(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<OrderUpdatedBody>,
) -> ApiResult<web::Json<DispatchResponseBody>> {
    let OrderUpdatedBody { before, after } = payload.into_inner();
    let update = OrderUpdate {
        order_id: OrderId::new(path.into_inner()),
        before: before.into_snapshot("before.")?,
        after: after.into_snapshot("after.")?,
    };
    let outcome = state.order_updated.on_order_updated(&update).await;
    info!(
        order_id = %update.order_id,
        outcome = outcome.label(),
        "order update handled"
    );
    Ok(web::Json(outcome.into()))
}

/// React to a new order by alerting online drivers.
#[utoipa::path(
    post,
    path = "/events/orders/{order_id}/created",
    params(("order_id" = String, Path, description = "Order document identifier")),
    request_body = OrderDocumentDto,
    responses(
        (status = 200, description = "Event handled", body = DispatchResponseBody),
        (status = 400, description = "Undecodable event", body = crate::domain::Error)
    ),
    tags = ["events"],
    operation_id = "orderCreated"
)]
#[post("/events/orders/{order_id}/created")]
pub async fn order_created(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<OrderDocumentDto>,
) -> ApiResult<web::Json<DispatchResponseBody>> {
    let created = OrderCreated {
        order_id: OrderId::new(path.into_inner()),
        order: payload.into_inner().into_snapshot("")?,
    };
    let outcome = state.order_created.on_order_created(&created).await;
    info!(
        order_id = %created.order_id,
        outcome = outcome.label(),
        "order creation handled"
    );
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
#[path = "order_events_tests.rs"]
mod tests;
