//! Domain types, services and ports.
//!
//! Purpose: model order events, push recipients and the order-history
//! backfill independently of any transport or store. Services receive their
//! collaborators as `Arc<dyn Port>` so adapters and test doubles plug in
//! interchangeably.

pub mod backfill;
pub mod dispatch;
pub mod error;
pub mod new_order_broadcaster;
pub mod order;
pub mod order_history;
pub mod ports;
pub mod status_change_notifier;
pub mod trace_id;
pub mod user;

pub use self::backfill::{
    BackfillRule, BackfillSweeper, DEFAULT_BACKFILL_BATCH_SIZE, SweepError, SweepReport,
};
pub use self::dispatch::{DispatchOutcome, ORDER_ID_KEY, STATUS_KEY, SkipReason, order_payload};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::new_order_broadcaster::{
    NEW_ORDER_BODY, NEW_ORDER_TITLE, NewOrderBroadcaster, is_same_local_day,
};
pub use self::order::{OrderCreated, OrderId, OrderSnapshot, OrderStatus, OrderUpdate, UserId};
pub use self::order_history::{
    CompletedAtBackfill, CompletedAtPatch, CompletedAtValue, OrderHistoryId, OrderHistoryRecord,
};
pub use self::status_change_notifier::{
    Recipient, StatusChangeNotifier, StatusNotification, status_notification,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DRIVER_ROLE, DeliveryToken, ONLINE_STATUS, UserContact};

/// Sweeper filling `completed_at` on order-history records.
pub type CompletedAtSweeper = BackfillSweeper<CompletedAtBackfill>;
