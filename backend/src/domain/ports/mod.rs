//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`BackfillCommand`, `OrderUpdatedHandler`,
//! `OrderCreatedHandler`) are called by inbound adapters. Driven ports
//! (`BackfillStore`, `UserDirectory`, `PushMessenger`) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod backfill_command;
mod backfill_store;
mod order_event_handlers;
mod push_messenger;
mod readiness_probe;
mod user_directory;

#[cfg(test)]
pub use backfill_command::MockBackfillCommand;
pub use backfill_command::{BackfillCommand, FixtureBackfillCommand};
pub use backfill_store::{
    BackfillStore, BackfillStoreError, NO_DATABASE_CONFIGURED, OrderHistoryBackfillStore,
    UnconfiguredBackfillStore,
};
#[cfg(test)]
pub use order_event_handlers::{MockOrderCreatedHandler, MockOrderUpdatedHandler};
pub use order_event_handlers::{OrderCreatedHandler, OrderUpdatedHandler};
#[cfg(test)]
pub use push_messenger::MockPushMessenger;
pub use push_messenger::{
    MulticastPushMessage, MulticastReport, PushData, PushMessage, PushMessenger,
    PushMessengerError, PushNotification, UnconfiguredPushMessenger,
};
#[cfg(test)]
pub use readiness_probe::MockReadinessProbe;
pub use readiness_probe::{ReadinessProbe, ReadinessProbeError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UnconfiguredUserDirectory, UserDirectory, UserDirectoryError};
