//! Wire shapes for order change events.
//!
//! Order documents are schemaless, so every field is optional and unknown
//! fields are ignored. Timestamps arrive either as RFC 3339 strings or as
//! `{seconds, nanoseconds}` objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DispatchOutcome, Error, OrderSnapshot, OrderStatus, UserId};

/// Timestamp split into whole seconds and nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TimestampPartsDto {
    /// Seconds since the Unix epoch.
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    /// Sub-second nanoseconds.
    #[serde(default, alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

/// Either accepted timestamp encoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum TimestampDto {
    /// RFC 3339 text, e.g. `2025-06-10T08:00:00+07:00`.
    Rfc3339(String),
    /// Seconds and nanoseconds since the epoch.
    Parts(TimestampPartsDto),
}

impl TimestampDto {
    fn to_utc(&self, field: &str) -> Result<DateTime<Utc>, Error> {
        let parsed = match self {
            Self::Rfc3339(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|value| value.with_timezone(&Utc)),
            Self::Parts(parts) => DateTime::from_timestamp(parts.seconds, parts.nanoseconds),
        };
        parsed.ok_or_else(|| {
            Error::invalid_request(format!("{field} is not a valid timestamp")).with_details(
                json!({ "field": field, "code": "invalid_timestamp" }),
            )
        })
    }
}

/// The order fields this service reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct OrderDocumentDto {
    /// Lifecycle status.
    #[serde(default)]
    pub status: Option<String>,
    /// Ordering customer.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Assigned driver.
    #[serde(default)]
    pub driver_id: Option<String>,
    /// Scheduled pickup.
    #[serde(default)]
    pub pickup_date: Option<TimestampDto>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl OrderDocumentDto {
    /// Convert to a domain snapshot, naming `prefix` in validation errors.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` when `pickup_date` cannot be decoded.
    pub fn into_snapshot(self, prefix: &str) -> Result<OrderSnapshot, Error> {
        let pickup_date = self
            .pickup_date
            .as_ref()
            .map(|value| value.to_utc(&format!("{prefix}pickup_date")))
            .transpose()?;
        Ok(OrderSnapshot {
            status: non_blank(self.status).map(|raw| OrderStatus::parse(&raw)),
            user_id: non_blank(self.user_id).map(UserId::new),
            driver_id: non_blank(self.driver_id).map(UserId::new),
            pickup_date,
        })
    }
}

/// Body of an order update event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct OrderUpdatedBody {
    /// Order before the mutation.
    pub before: OrderDocumentDto,
    /// Order after the mutation.
    pub after: OrderDocumentDto,
}

/// What the reaction did.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DispatchResponseBody {
    /// `sent`, `skipped` or `failed`.
    pub outcome: String,
    /// Skip reason or failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Devices the provider accepted, when sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered: Option<usize>,
    /// Devices addressed, when sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempted: Option<usize>,
}

impl From<DispatchOutcome> for DispatchResponseBody {
    fn from(outcome: DispatchOutcome) -> Self {
        let label = outcome.label().to_owned();
        match outcome {
            DispatchOutcome::Sent {
                delivered,
                attempted,
            } => Self {
                outcome: label,
                reason: None,
                delivered: Some(delivered),
                attempted: Some(attempted),
            },
            DispatchOutcome::Skipped(reason) => Self {
                outcome: label,
                reason: Some(reason.as_str().to_owned()),
                delivered: None,
                attempted: None,
            },
            DispatchOutcome::Failed(reason) => Self {
                outcome: label,
                reason: Some(reason),
                delivered: None,
                attempted: None,
            },
        }
    }
}
