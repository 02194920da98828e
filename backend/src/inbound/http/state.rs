//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on driving ports,
//! so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BackfillCommand, OrderCreatedHandler, OrderUpdatedHandler};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Runs the `completed_at` backfill.
    pub backfill: Arc<dyn BackfillCommand>,
    /// Reacts to order updates.
    pub order_updated: Arc<dyn OrderUpdatedHandler>,
    /// Reacts to order creations.
    pub order_created: Arc<dyn OrderCreatedHandler>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        backfill: Arc<dyn BackfillCommand>,
        order_updated: Arc<dyn OrderUpdatedHandler>,
        order_created: Arc<dyn OrderCreatedHandler>,
    ) -> Self {
        Self {
            backfill,
            order_updated,
            order_created,
        }
    }
}
