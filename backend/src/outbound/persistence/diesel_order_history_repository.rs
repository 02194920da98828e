//! PostgreSQL-backed order-history backfill store.
//!
//! Each committed batch runs in one transaction, so a failure leaves the
//! batch entirely unapplied.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Timestamptz};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{BackfillStore, BackfillStoreError};
use crate::domain::{CompletedAtPatch, CompletedAtValue, OrderHistoryId, OrderHistoryRecord};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::OrderHistoryRow;
use super::pool::{DbPool, PoolError};
use super::schema::order_history;

/// Diesel-backed store for the `completed_at` backfill.
#[derive(Clone)]
pub struct DieselOrderHistoryRepository {
    pool: DbPool,
}

impl DieselOrderHistoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BackfillStoreError {
    map_basic_pool_error(error, |message| BackfillStoreError::connection(message))
}

fn map_query_error(error: diesel::result::Error) -> BackfillStoreError {
    map_basic_diesel_error(
        error,
        BackfillStoreError::query,
        BackfillStoreError::connection,
    )
}

fn map_commit_error(error: diesel::result::Error) -> BackfillStoreError {
    map_basic_diesel_error(
        error,
        BackfillStoreError::commit,
        BackfillStoreError::connection,
    )
}

fn row_to_record(row: OrderHistoryRow) -> OrderHistoryRecord {
    OrderHistoryRecord {
        id: OrderHistoryId::new(row.id),
        completed_at: row.completed_at,
        archived_at: row.archived_at,
    }
}

fn server_now() -> diesel::expression::SqlLiteral<Nullable<Timestamptz>> {
    diesel::dsl::sql::<Nullable<Timestamptz>>("now()")
}

/// Split patches into explicit values and ids stamped with the server clock.
fn partition_patches(
    patches: &[CompletedAtPatch],
) -> (Vec<(&str, chrono::DateTime<chrono::Utc>)>, Vec<&str>) {
    let mut archived = Vec::new();
    let mut server_stamped = Vec::new();
    for patch in patches {
        match patch.completed_at {
            CompletedAtValue::Archived(at) => archived.push((patch.id.as_str(), at)),
            CompletedAtValue::ServerTimestamp => server_stamped.push(patch.id.as_str()),
        }
    }
    (archived, server_stamped)
}

#[async_trait]
impl BackfillStore<OrderHistoryRecord, CompletedAtPatch> for DieselOrderHistoryRepository {
    async fn fetch_pending(
        &self,
        limit: usize,
    ) -> Result<Vec<OrderHistoryRecord>, BackfillStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<OrderHistoryRow> = order_history::table
            .filter(order_history::completed_at.is_null())
            .order(order_history::id.asc())
            .limit(limit)
            .select(OrderHistoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn commit(&self, patches: &[CompletedAtPatch]) -> Result<(), BackfillStoreError> {
        if patches.is_empty() {
            return Ok(());
        }
        let (archived, server_stamped) = partition_patches(patches);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                for (id, at) in archived {
                    diesel::update(
                        order_history::table
                            .filter(order_history::id.eq(id))
                            .filter(order_history::completed_at.is_null()),
                    )
                    .set(order_history::completed_at.eq(Some(at)))
                    .execute(conn)
                    .await?;
                }
                if !server_stamped.is_empty() {
                    diesel::update(
                        order_history::table
                            .filter(order_history::id.eq_any(server_stamped))
                            .filter(order_history::completed_at.is_null()),
                    )
                    .set(order_history::completed_at.eq(server_now()))
                    .execute(conn)
                    .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_commit_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn rows_convert_field_for_field() {
        let archived = Utc
            .with_ymd_and_hms(2024, 12, 31, 23, 0, 0)
            .single()
            .expect("valid time");
        let record = row_to_record(OrderHistoryRow {
            id: "h-9".to_owned(),
            completed_at: None,
            archived_at: Some(archived),
        });
        assert_eq!(record.id.as_str(), "h-9");
        assert_eq!(record.completed_at, None);
        assert_eq!(record.archived_at, Some(archived));
    }

    #[rstest]
    fn patches_split_by_value_source() {
        let at = Utc
            .with_ymd_and_hms(2025, 2, 2, 2, 0, 0)
            .single()
            .expect("valid time");
        let patches = vec![
            CompletedAtPatch {
                id: OrderHistoryId::new("a"),
                completed_at: CompletedAtValue::Archived(at),
            },
            CompletedAtPatch {
                id: OrderHistoryId::new("b"),
                completed_at: CompletedAtValue::ServerTimestamp,
            },
        ];
        let (archived, server_stamped) = partition_patches(&patches);
        assert_eq!(archived, vec![("a", at)]);
        assert_eq!(server_stamped, vec!["b"]);
    }

    #[rstest]
    fn commit_failures_map_to_commit_errors() {
        let err = map_commit_error(diesel::result::Error::RollbackTransaction);
        assert!(matches!(err, BackfillStoreError::Commit { .. }));
    }

    #[rstest]
    fn pool_failures_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert_eq!(err, BackfillStoreError::connection("refused"));
    }
}
