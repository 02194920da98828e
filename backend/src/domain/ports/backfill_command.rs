//! Driving port for running a backfill sweep on demand.

use async_trait::async_trait;

use crate::domain::{SweepError, SweepReport};

/// Port for triggering one full backfill sweep.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackfillCommand: Send + Sync {
    /// Sweep every pending record and report how many were updated.
    async fn run(&self) -> Result<SweepReport, SweepError>;
}

/// Fixture command reporting an already-complete backfill.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBackfillCommand;

#[async_trait]
impl BackfillCommand for FixtureBackfillCommand {
    async fn run(&self) -> Result<SweepReport, SweepError> {
        Ok(SweepReport::default())
    }
}
