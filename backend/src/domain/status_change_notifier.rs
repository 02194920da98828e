//! Push notifications for order status transitions.
//!
//! Each mapped status notifies exactly one party: the customer for
//! driver-side progress, the driver once the customer has paid or
//! confirmed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::dispatch::{DispatchOutcome, SkipReason, order_payload};
use super::ports::{OrderUpdatedHandler, PushMessage, PushMessenger, PushNotification, UserDirectory};
use super::{OrderSnapshot, OrderStatus, OrderUpdate, UserId};

/// Which party of the order receives the push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// The customer in `user_id`.
    Customer,
    /// The assigned driver in `driver_id`.
    Driver,
}

impl Recipient {
    fn resolve(self, order: &OrderSnapshot) -> Option<&UserId> {
        match self {
            Self::Customer => order.user_id.as_ref(),
            Self::Driver => order.driver_id.as_ref(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Driver => "driver",
        }
    }
}

/// Notification rule for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusNotification {
    /// Who is notified.
    pub recipient: Recipient,
    /// Notification title.
    pub title: &'static str,
    /// Notification body.
    pub body: &'static str,
}

/// The rule for `status`, if it has one.
///
/// # Examples
/// ```
/// use pickup_backend::domain::{OrderStatus, Recipient, status_notification};
///
/// let rule = status_notification(&OrderStatus::PaymentSuccess).expect("mapped");
/// assert_eq!(rule.recipient, Recipient::Driver);
/// assert!(status_notification(&OrderStatus::Waiting).is_none());
/// ```
pub fn status_notification(status: &OrderStatus) -> Option<StatusNotification> {
    let (recipient, title, body) = match status {
        OrderStatus::Accepted => (
            Recipient::Customer,
            "Driver Ditemukan",
            "Driver telah menerima pesanan Anda.",
        ),
        OrderStatus::OnTheWay => (
            Recipient::Customer,
            "Driver Dalam Perjalanan",
            "Driver sedang menuju lokasi penjemputan.",
        ),
        OrderStatus::Arrived => (
            Recipient::Customer,
            "Driver Telah Sampai",
            "Driver telah sampai. Silakan siapkan barang Anda.",
        ),
        OrderStatus::PickupConfirmedByDriver => (
            Recipient::Customer,
            "Konfirmasi Penjemputan",
            "Driver telah menyelesaikan penjemputan. Mohon konfirmasi.",
        ),
        OrderStatus::PaymentSuccess => (
            Recipient::Driver,
            "Pembayaran Berhasil",
            "User telah membayar. Silakan konfirmasi penjemputan.",
        ),
        OrderStatus::Completed => (
            Recipient::Driver,
            "Pesanan Selesai",
            "User telah mengkonfirmasi penjemputan.",
        ),
        OrderStatus::Waiting | OrderStatus::Pending | OrderStatus::Other(_) => return None,
    };
    Some(StatusNotification {
        recipient,
        title,
        body,
    })
}

/// Sends one push per qualifying status change.
pub struct StatusChangeNotifier {
    users: Arc<dyn UserDirectory>,
    messenger: Arc<dyn PushMessenger>,
}

impl StatusChangeNotifier {
    /// Build a notifier over the given ports.
    pub fn new(users: Arc<dyn UserDirectory>, messenger: Arc<dyn PushMessenger>) -> Self {
        Self { users, messenger }
    }

    /// React to one update event.
    pub async fn notify(&self, update: &OrderUpdate) -> DispatchOutcome {
        let order_id = update.order_id.as_str();
        let Some(status) = update.changed_status() else {
            debug!(order_id, "order status unchanged; no notification");
            return DispatchOutcome::Skipped(SkipReason::StatusUnchanged);
        };
        let Some(rule) = status_notification(status) else {
            debug!(order_id, status = %status, "status has no notification rule");
            return DispatchOutcome::Skipped(SkipReason::UnmappedStatus);
        };
        let Some(recipient_id) = rule.recipient.resolve(&update.after) else {
            warn!(
                order_id,
                status = %status,
                recipient = rule.recipient.as_str(),
                "order has no recipient for status notification"
            );
            return DispatchOutcome::Skipped(SkipReason::MissingRecipient);
        };

        let contact = match self.users.find_user(recipient_id).await {
            Ok(Some(contact)) => contact,
            Ok(None) => {
                warn!(order_id, user_id = %recipient_id, "recipient user not found");
                return DispatchOutcome::Skipped(SkipReason::RecipientNotFound);
            }
            Err(err) => {
                error!(order_id, user_id = %recipient_id, error = %err, "recipient lookup failed");
                return DispatchOutcome::Failed(err.to_string());
            }
        };
        let Some(token) = contact.fcm_token else {
            info!(order_id, user_id = %recipient_id, "recipient has no delivery token");
            return DispatchOutcome::Skipped(SkipReason::MissingDeliveryToken);
        };

        let message = PushMessage {
            token,
            notification: PushNotification::new(rule.title, rule.body),
            data: order_payload(&update.order_id, status),
        };
        match self.messenger.send(&message).await {
            Ok(()) => {
                info!(
                    order_id,
                    status = %status,
                    user_id = %recipient_id,
                    token = %message.token,
                    "status notification sent"
                );
                DispatchOutcome::Sent {
                    delivered: 1,
                    attempted: 1,
                }
            }
            Err(err) => {
                error!(
                    order_id,
                    status = %status,
                    token = %message.token,
                    error = %err,
                    "status notification failed"
                );
                DispatchOutcome::Failed(err.to_string())
            }
        }
    }
}

#[async_trait]
impl OrderUpdatedHandler for StatusChangeNotifier {
    async fn on_order_updated(&self, update: &OrderUpdate) -> DispatchOutcome {
        self.notify(update).await
    }
}
