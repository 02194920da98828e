//! Batched backfill of derived fields.
//!
//! A [`BackfillRule`] decides, per record, whether a patch is needed and what
//! it contains. [`BackfillSweeper`] pages through a [`BackfillStore`],
//! committing each page's patches atomically until the store is drained.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::ports::{BackfillCommand, BackfillStore, BackfillStoreError};

/// Records fetched and patches committed per batch.
pub const DEFAULT_BACKFILL_BATCH_SIZE: usize = 500;

/// Pure rule deriving a patch from a record.
pub trait BackfillRule: Send + Sync + 'static {
    /// Record type read from the store.
    type Record: Send + 'static;
    /// Patch type written back.
    type Patch: Send + Sync + 'static;

    /// The patch to apply, or `None` when the record is already complete.
    fn patch_for(&self, record: &Self::Record) -> Option<Self::Patch>;
}

/// Summary of a finished sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Records patched across all batches.
    pub updated: usize,
    /// Batches committed.
    pub batches: usize,
}

/// A sweep aborted by a store failure.
///
/// Batches committed before the failure stay committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source}")]
pub struct SweepError {
    /// Records patched by earlier, committed batches.
    pub updated_before_failure: usize,
    /// The store failure.
    pub source: BackfillStoreError,
}

/// Runs a [`BackfillRule`] over every pending record of a store.
pub struct BackfillSweeper<R: BackfillRule> {
    store: Arc<dyn BackfillStore<R::Record, R::Patch>>,
    rule: R,
    batch_size: usize,
}

impl<R: BackfillRule> BackfillSweeper<R> {
    /// Build a sweeper using [`DEFAULT_BACKFILL_BATCH_SIZE`].
    pub fn new(store: Arc<dyn BackfillStore<R::Record, R::Patch>>, rule: R) -> Self {
        Self {
            store,
            rule,
            batch_size: DEFAULT_BACKFILL_BATCH_SIZE,
        }
    }

    /// Override the batch size. Zero is clamped to one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Sweep until the store runs out of pending records.
    ///
    /// The sweep stops after a short page, an empty page, or a page in which
    /// the rule patched nothing. The last case guards against a store that
    /// keeps returning already-complete records.
    pub async fn sweep(&self) -> Result<SweepReport, SweepError> {
        let mut report = SweepReport::default();
        loop {
            let records = self
                .store
                .fetch_pending(self.batch_size)
                .await
                .map_err(|source| abort(&report, source))?;
            if records.is_empty() {
                break;
            }
            let fetched = records.len();
            let patches: Vec<R::Patch> = records
                .iter()
                .filter_map(|record| self.rule.patch_for(record))
                .collect();
            if patches.is_empty() {
                warn!(fetched, "backfill page produced no patches; stopping sweep");
                break;
            }
            self.store
                .commit(&patches)
                .await
                .map_err(|source| abort(&report, source))?;
            report.updated += patches.len();
            report.batches += 1;
            debug!(
                batch = report.batches,
                batch_updated = patches.len(),
                total_updated = report.updated,
                "backfill batch committed"
            );
            if fetched < self.batch_size {
                break;
            }
        }
        info!(
            updated = report.updated,
            batches = report.batches,
            "backfill sweep finished"
        );
        Ok(report)
    }
}

fn abort(report: &SweepReport, source: BackfillStoreError) -> SweepError {
    error!(
        error = %source,
        updated_before_failure = report.updated,
        "backfill sweep aborted"
    );
    SweepError {
        updated_before_failure: report.updated,
        source,
    }
}

#[async_trait]
impl<R: BackfillRule> BackfillCommand for BackfillSweeper<R> {
    async fn run(&self) -> Result<SweepReport, SweepError> {
        self.sweep().await
    }
}

#[cfg(test)]
#[path = "backfill_tests.rs"]
mod tests;
