//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP path in the inbound layer together with
//! the request and response schemas. The document backs Swagger UI in debug
//! builds and is exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::backfill::BackfillResponseBody;
use crate::inbound::http::order_events_dto::{
    DispatchResponseBody, OrderDocumentDto, OrderUpdatedBody, TimestampDto, TimestampPartsDto,
};

/// OpenAPI document for the pickup backend.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pickup backend API",
        description = "Order event reactions, the completed_at backfill and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::backfill::backfill_completed_at,
        crate::inbound::http::order_events::order_updated,
        crate::inbound::http::order_events::order_created,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        BackfillResponseBody,
        DispatchResponseBody,
        OrderDocumentDto,
        OrderUpdatedBody,
        TimestampDto,
        TimestampPartsDto,
    )),
    tags(
        (name = "backfill", description = "Maintenance sweeps over order history"),
        (name = "events", description = "Order change event hooks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
