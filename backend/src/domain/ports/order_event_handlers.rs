//! Driving ports for order change events.
//!
//! Handlers never fail: every problem is folded into the returned
//! [`DispatchOutcome`] so the event source does not retry.

use async_trait::async_trait;

use crate::domain::{DispatchOutcome, OrderCreated, OrderUpdate};

/// Port reacting to an order update.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderUpdatedHandler: Send + Sync {
    /// Handle one update event.
    async fn on_order_updated(&self, update: &OrderUpdate) -> DispatchOutcome;
}

/// Port reacting to an order creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCreatedHandler: Send + Sync {
    /// Handle one creation event.
    async fn on_order_created(&self, created: &OrderCreated) -> DispatchOutcome;
}
