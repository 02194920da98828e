//! Driven port for looking up push recipients in the user collection.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{UserContact, UserId};

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// The directory could not be reached.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// The lookup failed while executing.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Port for reading user contact details.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch one user by identifier. Missing users yield `Ok(None)`.
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserContact>, UserDirectoryError>;

    /// List every user whose role is `driver` and status is `online`.
    async fn list_online_drivers(&self) -> Result<Vec<UserContact>, UserDirectoryError>;
}

/// Stand-in directory for deployments without a database.
///
/// Lookups fail with a connection error rather than reporting missing users.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredUserDirectory;

const NO_DATABASE_CONFIGURED: &str = "no database configured";

#[async_trait]
impl UserDirectory for UnconfiguredUserDirectory {
    async fn find_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserContact>, UserDirectoryError> {
        Err(UserDirectoryError::connection(NO_DATABASE_CONFIGURED))
    }

    async fn list_online_drivers(&self) -> Result<Vec<UserContact>, UserDirectoryError> {
        Err(UserDirectoryError::connection(NO_DATABASE_CONFIGURED))
    }
}
