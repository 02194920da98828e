//! Order records as delivered by the store's change events.
//!
//! This service never writes orders. It receives snapshots of the record
//! before and after a mutation and reacts to them.

use std::fmt;

use chrono::{DateTime, Utc};

/// Document identifier of an order record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap a raw document identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document identifier of a user record (customer or driver).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw document identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an order.
///
/// Unknown values are kept verbatim in [`OrderStatus::Other`] so a new client
/// status never fails decoding; it simply maps to no notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Created, waiting for a driver.
    Waiting,
    /// Created, pending driver assignment.
    Pending,
    /// A driver accepted the order.
    Accepted,
    /// The driver is heading to the pickup location.
    OnTheWay,
    /// The driver reached the pickup location.
    Arrived,
    /// The driver confirmed the pickup; the user has yet to confirm.
    PickupConfirmedByDriver,
    /// The user paid for the pickup.
    PaymentSuccess,
    /// The user confirmed the pickup.
    Completed,
    /// Any status this service has no rule for.
    Other(String),
}

impl OrderStatus {
    /// Parse the wire value. Never fails.
    ///
    /// # Examples
    /// ```
    /// use pickup_backend::domain::OrderStatus;
    ///
    /// assert_eq!(OrderStatus::parse("on_the_way"), OrderStatus::OnTheWay);
    /// assert_eq!(OrderStatus::parse("cancelled").as_str(), "cancelled");
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw {
            "waiting" => Self::Waiting,
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "on_the_way" => Self::OnTheWay,
            "arrived" => Self::Arrived,
            "pickup_confirmed_by_driver" => Self::PickupConfirmedByDriver,
            "payment_success" => Self::PaymentSuccess,
            "completed" => Self::Completed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Wire value of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "waiting",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::OnTheWay => "on_the_way",
            Self::Arrived => "arrived",
            Self::PickupConfirmedByDriver => "pickup_confirmed_by_driver",
            Self::PaymentSuccess => "payment_success",
            Self::Completed => "completed",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Whether a newly created order in this status can still be picked up.
    pub fn is_open_for_drivers(&self) -> bool {
        matches!(self, Self::Waiting | Self::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of an order record this service reads.
///
/// Every field is optional because the store is schemaless and clients have
/// shipped orders with fields missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSnapshot {
    /// Current lifecycle status.
    pub status: Option<OrderStatus>,
    /// The customer who placed the order.
    pub user_id: Option<UserId>,
    /// The driver assigned to the order.
    pub driver_id: Option<UserId>,
    /// Scheduled pickup instant.
    pub pickup_date: Option<DateTime<Utc>>,
}

/// One update event: the order before and after the mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    /// Identifier of the mutated order.
    pub order_id: OrderId,
    /// Record state before the mutation.
    pub before: OrderSnapshot,
    /// Record state after the mutation.
    pub after: OrderSnapshot,
}

impl OrderUpdate {
    /// The new status, when the mutation changed it.
    ///
    /// Returns `None` when the status is unchanged or was removed.
    pub fn changed_status(&self) -> Option<&OrderStatus> {
        if self.before.status == self.after.status {
            return None;
        }
        self.after.status.as_ref()
    }
}

/// One creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreated {
    /// Identifier of the new order.
    pub order_id: OrderId,
    /// The created record.
    pub order: OrderSnapshot,
}
