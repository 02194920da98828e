//! Driven port for stores holding records that need a field backfilled.
//!
//! The store is generic over the record it hands out and the patch it
//! applies, so any rule that derives a missing field can reuse the same
//! batched sweep.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CompletedAtPatch, OrderHistoryRecord};

define_port_error! {
    /// Errors raised by backfill stores.
    pub enum BackfillStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "backfill store connection failed: {message}",
        /// Reading candidate records failed.
        Query { message: String } =>
            "backfill store query failed: {message}",
        /// Applying a batch failed; none of its patches were written.
        Commit { message: String } =>
            "backfill batch commit failed: {message}",
    }
}

/// Port for reading pending records and atomically committing patches.
#[async_trait]
pub trait BackfillStore<Record, Patch>: Send + Sync
where
    Record: Send + 'static,
    Patch: Send + Sync + 'static,
{
    /// Return up to `limit` records that may still need a patch.
    ///
    /// Records that have already been patched must not be returned again,
    /// otherwise a sweep would never terminate.
    async fn fetch_pending(&self, limit: usize) -> Result<Vec<Record>, BackfillStoreError>;

    /// Apply every patch in one atomic write.
    async fn commit(&self, patches: &[Patch]) -> Result<(), BackfillStoreError>;
}

/// Store for order-history records missing `completed_at`.
pub type OrderHistoryBackfillStore = dyn BackfillStore<OrderHistoryRecord, CompletedAtPatch>;

/// Message carried by every error of [`UnconfiguredBackfillStore`].
pub const NO_DATABASE_CONFIGURED: &str = "no database configured";

/// Stand-in store for deployments without a database.
///
/// Every call fails with a connection error, so a sweep reports a failure
/// instead of claiming there was nothing to do.
#[derive(Debug)]
pub struct UnconfiguredBackfillStore<Record, Patch> {
    _marker: PhantomData<fn() -> (Record, Patch)>,
}

impl<Record, Patch> Default for UnconfiguredBackfillStore<Record, Patch> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<Record, Patch> BackfillStore<Record, Patch> for UnconfiguredBackfillStore<Record, Patch>
where
    Record: Send + 'static,
    Patch: Send + Sync + 'static,
{
    async fn fetch_pending(&self, _limit: usize) -> Result<Vec<Record>, BackfillStoreError> {
        Err(BackfillStoreError::connection(NO_DATABASE_CONFIGURED))
    }

    async fn commit(&self, _patches: &[Patch]) -> Result<(), BackfillStoreError> {
        Err(BackfillStoreError::connection(NO_DATABASE_CONFIGURED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn unconfigured_store_refuses_every_call() {
        let store = UnconfiguredBackfillStore::<OrderHistoryRecord, CompletedAtPatch>::default();
        let expected = BackfillStoreError::connection(NO_DATABASE_CONFIGURED);
        assert_eq!(store.fetch_pending(500).await, Err(expected.clone()));
        assert_eq!(store.commit(&[]).await, Err(expected));
    }

    #[rstest]
    fn commit_errors_mention_atomicity() {
        let err = BackfillStoreError::commit("deadlock detected");
        assert_eq!(err.to_string(), "backfill batch commit failed: deadlock detected");
    }
}
