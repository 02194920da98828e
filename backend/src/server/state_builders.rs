//! Builders wiring adapters into the domain services behind `HttpState`.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use tracing::warn;

use pickup_backend::domain::ports::{
    OrderHistoryBackfillStore, PushMessenger, UnconfiguredBackfillStore, UnconfiguredPushMessenger,
    UnconfiguredUserDirectory, UserDirectory,
};
use pickup_backend::domain::{
    CompletedAtBackfill, CompletedAtSweeper, NewOrderBroadcaster, StatusChangeNotifier,
};
use pickup_backend::inbound::http::health::HealthState;
use pickup_backend::inbound::http::state::HttpState;
use pickup_backend::outbound::persistence::{DieselOrderHistoryRepository, DieselUserDirectory};

use super::ServerConfig;

fn build_stores(config: &ServerConfig) -> (Arc<OrderHistoryBackfillStore>, Arc<dyn UserDirectory>) {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselOrderHistoryRepository::new(pool.clone())),
            Arc::new(DieselUserDirectory::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; sweeps and recipient lookups will fail");
            (
                Arc::new(UnconfiguredBackfillStore::default()),
                Arc::new(UnconfiguredUserDirectory),
            )
        }
    }
}

fn build_messenger(config: &ServerConfig) -> Arc<dyn PushMessenger> {
    config.messenger.clone().unwrap_or_else(|| {
        warn!("no push messenger configured; sends will report failure");
        Arc::new(UnconfiguredPushMessenger)
    })
}

/// Build the handler state. Unset adapters are replaced by stand-ins that fail.
pub(super) fn build_http_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> web::Data<HttpState> {
    let (history, users) = build_stores(config);
    let messenger = build_messenger(config);

    let sweeper = CompletedAtSweeper::new(history, CompletedAtBackfill)
        .with_batch_size(config.backfill_batch_size);
    web::Data::new(HttpState::new(
        Arc::new(sweeper),
        Arc::new(StatusChangeNotifier::new(users.clone(), messenger.clone())),
        Arc::new(NewOrderBroadcaster::new(users, messenger, clock)),
    ))
}

/// Health state probing the database when one is configured.
pub fn build_health_state(config: &ServerConfig) -> HealthState {
    match &config.db_pool {
        Some(pool) => HealthState::new().with_probe(Arc::new(pool.clone())),
        None => HealthState::new(),
    }
}
