//! HTTP inbound adapter exposing the backfill trigger, order event hooks and
//! health probes.

use actix_web::web;

pub mod backfill;
pub mod error;
pub mod health;
pub mod order_events;
pub mod order_events_dto;
pub mod state;

pub use error::ApiResult;

/// Register every route served by this adapter.
///
/// Callers provide `web::Data<HttpState>` and `web::Data<HealthState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(
            web::resource("/backfill/completed-at")
                .route(web::get().to(backfill::backfill_completed_at))
                .route(web::post().to(backfill::backfill_completed_at)),
        )
        .service(order_events::order_updated)
        .service(order_events::order_created)
        .service(health::ready)
        .service(health::live);
}
