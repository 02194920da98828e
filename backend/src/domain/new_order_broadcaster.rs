//! Broadcast of same-day orders to every online driver.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use tracing::{debug, error, info};

use super::dispatch::{DispatchOutcome, SkipReason, order_payload};
use super::ports::{
    MulticastPushMessage, OrderCreatedHandler, PushMessenger, PushNotification, UserDirectory,
};
use super::{DeliveryToken, OrderCreated};

/// Title of the new-order broadcast.
pub const NEW_ORDER_TITLE: &str = "Pesanan Baru!";
/// Body of the new-order broadcast.
pub const NEW_ORDER_BODY: &str = "Ada pesanan penjemputan baru untuk hari ini. Segera ambil!";

/// Whether `pickup` falls on the same local calendar day as `now`.
pub fn is_same_local_day(pickup: DateTime<Utc>, now: DateTime<Local>) -> bool {
    pickup.with_timezone(&Local).date_naive() == now.date_naive()
}

/// Tells online drivers about orders they can pick up today.
pub struct NewOrderBroadcaster {
    users: Arc<dyn UserDirectory>,
    messenger: Arc<dyn PushMessenger>,
    clock: Arc<dyn Clock>,
}

impl NewOrderBroadcaster {
    /// Build a broadcaster over the given ports.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        messenger: Arc<dyn PushMessenger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            messenger,
            clock,
        }
    }

    /// React to one creation event.
    pub async fn broadcast(&self, created: &OrderCreated) -> DispatchOutcome {
        let order_id = created.order_id.as_str();
        let order = &created.order;
        let Some(pickup) = order.pickup_date else {
            debug!(order_id, "new order has no pickup date");
            return DispatchOutcome::Skipped(SkipReason::MissingPickupDate);
        };
        if !is_same_local_day(pickup, self.clock.local()) {
            debug!(order_id, pickup = %pickup, "new order is not scheduled for today");
            return DispatchOutcome::Skipped(SkipReason::NotScheduledToday);
        }
        let Some(status) = order.status.as_ref().filter(|s| s.is_open_for_drivers()) else {
            debug!(order_id, "new order is not waiting for a driver");
            return DispatchOutcome::Skipped(SkipReason::StatusNotOpen);
        };

        let drivers = match self.users.list_online_drivers().await {
            Ok(drivers) => drivers,
            Err(err) => {
                error!(order_id, error = %err, "listing online drivers failed");
                return DispatchOutcome::Failed(err.to_string());
            }
        };
        let tokens: Vec<DeliveryToken> = drivers
            .into_iter()
            .filter_map(|driver| driver.fcm_token)
            .collect();
        info!(order_id, token_count = tokens.len(), "collected online driver tokens");
        if tokens.is_empty() {
            return DispatchOutcome::Skipped(SkipReason::NoDriverTokens);
        }

        let message = MulticastPushMessage {
            tokens,
            notification: PushNotification::new(NEW_ORDER_TITLE, NEW_ORDER_BODY),
            data: order_payload(&created.order_id, status),
        };
        let attempted = message.tokens.len();
        match self.messenger.send_multicast(&message).await {
            Ok(report) => {
                info!(
                    order_id,
                    success_count = report.success_count,
                    failure_count = report.failure_count,
                    "new order broadcast sent"
                );
                DispatchOutcome::Sent {
                    delivered: report.success_count,
                    attempted,
                }
            }
            Err(err) => {
                error!(order_id, error = %err, "new order broadcast failed");
                DispatchOutcome::Failed(err.to_string())
            }
        }
    }
}

#[async_trait]
impl OrderCreatedHandler for NewOrderBroadcaster {
    async fn on_order_created(&self, created: &OrderCreated) -> DispatchOutcome {
        self.broadcast(created).await
    }
}
