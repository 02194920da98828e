//! PostgreSQL-backed `UserDirectory` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{DRIVER_ROLE, DeliveryToken, ONLINE_STATUS, UserContact, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    map_basic_pool_error(error, |message| UserDirectoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_basic_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

fn row_to_contact(row: UserRow) -> UserContact {
    UserContact {
        id: UserId::new(row.id),
        role: row.role,
        status: row.status,
        fcm_token: row.fcm_token.and_then(DeliveryToken::new),
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserContact>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(user_id.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_contact))
    }

    async fn list_online_drivers(&self) -> Result<Vec<UserContact>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::role.eq(DRIVER_ROLE))
            .filter(users::status.eq(ONLINE_STATUS))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_contact).collect())
    }
}
