//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed stores using Diesel
//! - **fcm**: Firebase Cloud Messaging push delivery over HTTP
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod fcm;
pub mod persistence;
