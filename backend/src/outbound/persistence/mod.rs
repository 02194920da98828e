//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module.
//!
//! # Example
//!
//! ```ignore
//! use pickup_backend::outbound::persistence::{DbPool, DieselUserDirectory, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pickup")).await?;
//! let users = DieselUserDirectory::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_order_history_repository;
mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_order_history_repository::DieselOrderHistoryRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
