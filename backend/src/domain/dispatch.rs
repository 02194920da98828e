//! Outcome of reacting to one order event.

use std::fmt;

use super::ports::PushData;
use super::{OrderId, OrderStatus};

/// Payload key carrying the order identifier.
pub const ORDER_ID_KEY: &str = "order_id";
/// Payload key carrying the order status.
pub const STATUS_KEY: &str = "status";

/// Why an event produced no push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The update did not change the status.
    StatusUnchanged,
    /// The new status has no notification rule.
    UnmappedStatus,
    /// The order lacks the recipient field the rule targets.
    MissingRecipient,
    /// The recipient's user record does not exist.
    RecipientNotFound,
    /// The recipient has no registered device.
    MissingDeliveryToken,
    /// The new order has no pickup date.
    MissingPickupDate,
    /// The pickup date is not today in the server's local time.
    NotScheduledToday,
    /// The new order is not waiting for a driver.
    StatusNotOpen,
    /// No online driver has a registered device.
    NoDriverTokens,
}

impl SkipReason {
    /// Stable snake_case label used in logs and HTTP responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StatusUnchanged => "status_unchanged",
            Self::UnmappedStatus => "unmapped_status",
            Self::MissingRecipient => "missing_recipient",
            Self::RecipientNotFound => "recipient_not_found",
            Self::MissingDeliveryToken => "missing_delivery_token",
            Self::MissingPickupDate => "missing_pickup_date",
            Self::NotScheduledToday => "not_scheduled_today",
            Self::StatusNotOpen => "status_not_open",
            Self::NoDriverTokens => "no_driver_tokens",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a reaction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A push was handed to the messaging provider.
    Sent {
        /// Devices the provider accepted.
        delivered: usize,
        /// Devices addressed.
        attempted: usize,
    },
    /// Nothing was sent, deliberately.
    Skipped(SkipReason),
    /// A dependency failed; the message is the error text.
    Failed(String),
}

impl DispatchOutcome {
    /// Stable label: `sent`, `skipped` or `failed`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sent { .. } => "sent",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// Data payload attached to every order push.
pub fn order_payload(order_id: &OrderId, status: &OrderStatus) -> PushData {
    PushData::from([
        (ORDER_ID_KEY.to_owned(), order_id.as_str().to_owned()),
        (STATUS_KEY.to_owned(), status.as_str().to_owned()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn payload_has_exactly_order_id_and_status() {
        let data = order_payload(&OrderId::new("o-7"), &OrderStatus::PaymentSuccess);
        assert_eq!(data.len(), 2);
        assert_eq!(data.get("order_id").map(String::as_str), Some("o-7"));
        assert_eq!(data.get("status").map(String::as_str), Some("payment_success"));
    }

    #[rstest]
    #[case(DispatchOutcome::Sent { delivered: 1, attempted: 1 }, "sent")]
    #[case(DispatchOutcome::Skipped(SkipReason::NoDriverTokens), "skipped")]
    #[case(DispatchOutcome::Failed("boom".to_owned()), "failed")]
    fn outcome_labels(#[case] outcome: DispatchOutcome, #[case] expected: &str) {
        assert_eq!(outcome.label(), expected);
    }
}
