//! Archived orders and the `completed_at` backfill rule.
//!
//! Older app versions archived orders without stamping `completed_at`. The
//! rule below derives the missing value: the archive time when there is one,
//! otherwise a timestamp assigned by the store when the patch is committed.

use chrono::{DateTime, Utc};

use super::backfill::BackfillRule;

/// Document identifier of an order-history record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderHistoryId(String);

impl OrderHistoryId {
    /// Wrap a raw document identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The fields of an order-history record the backfill reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHistoryRecord {
    /// Record identifier.
    pub id: OrderHistoryId,
    /// Completion instant, missing on legacy records.
    pub completed_at: Option<DateTime<Utc>>,
    /// Archive instant, when the archiver stamped one.
    pub archived_at: Option<DateTime<Utc>>,
}

/// Value written into `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletedAtValue {
    /// Copy of the record's `archived_at`.
    Archived(DateTime<Utc>),
    /// "Now" as assigned by the store at commit time.
    ServerTimestamp,
}

/// Single-field update produced by [`CompletedAtBackfill`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedAtPatch {
    /// Record to update.
    pub id: OrderHistoryId,
    /// Value to store.
    pub completed_at: CompletedAtValue,
}

/// Rule filling `completed_at` from `archived_at` or the server clock.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use pickup_backend::domain::{
///     BackfillRule, CompletedAtBackfill, CompletedAtValue, OrderHistoryId, OrderHistoryRecord,
/// };
///
/// let archived = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).single().expect("valid time");
/// let record = OrderHistoryRecord {
///     id: OrderHistoryId::new("h-1"),
///     completed_at: None,
///     archived_at: Some(archived),
/// };
/// let patch = CompletedAtBackfill.patch_for(&record).expect("patch");
/// assert_eq!(patch.completed_at, CompletedAtValue::Archived(archived));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletedAtBackfill;

impl BackfillRule for CompletedAtBackfill {
    type Record = OrderHistoryRecord;
    type Patch = CompletedAtPatch;

    fn patch_for(&self, record: &OrderHistoryRecord) -> Option<CompletedAtPatch> {
        if record.completed_at.is_some() {
            return None;
        }
        let completed_at = record
            .archived_at
            .map_or(CompletedAtValue::ServerTimestamp, CompletedAtValue::Archived);
        Some(CompletedAtPatch {
            id: record.id.clone(),
            completed_at,
        })
    }
}
