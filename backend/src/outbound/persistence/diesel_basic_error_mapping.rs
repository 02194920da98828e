//! Shared Diesel error mapping for adapters with connection/query errors.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into an adapter-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Probe { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// Closed connections map to `connection`; everything else is a query
/// failure carrying a generic message. Details go to the debug log only.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::RollbackTransaction | DieselError::RollbackErrorOnCommit { .. } => {
            query("transaction rolled back")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserDirectoryError;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_basic_pool_error(PoolError::checkout("timed out"), |message| {
            UserDirectoryError::connection(message)
        });
        assert_eq!(err, UserDirectoryError::connection("timed out"));
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        let err = map_basic_diesel_error(
            diesel::result::Error::NotFound,
            UserDirectoryError::query,
            UserDirectoryError::connection,
        );
        assert_eq!(err, UserDirectoryError::query("record not found"));
    }
}
