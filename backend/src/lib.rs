//! Pickup backend: reacts to order changes with push notifications and
//! backfills `completed_at` on archived orders.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the services and
//! ports, [`inbound`] the HTTP adapter and [`outbound`] the PostgreSQL and
//! FCM adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
