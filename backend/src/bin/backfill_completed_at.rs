//! Run the `completed_at` backfill once against a database and exit.
//!
//! Prints `{"ok":true,"updated":N}` on success. On failure prints
//! `{"ok":false,"error":"..."}` and exits non-zero; batches committed before
//! the failure stay committed.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pickup_backend::domain::{
    CompletedAtBackfill, CompletedAtSweeper, DEFAULT_BACKFILL_BATCH_SIZE,
};
use pickup_backend::outbound::persistence::{
    DbPool, DieselOrderHistoryRepository, PoolConfig, run_pending_migrations,
};

#[derive(Debug, Parser)]
#[command(
    name = "backfill-completed-at",
    about = "Fill completed_at on archived orders that lack it"
)]
struct Cli {
    /// PostgreSQL connection URL.
    #[arg(long)]
    database_url: String,
    /// Records fetched and committed per batch.
    #[arg(long, default_value_t = DEFAULT_BACKFILL_BATCH_SIZE)]
    batch_size: usize,
    /// Apply embedded migrations before sweeping.
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    if cli.migrate {
        let applied = run_pending_migrations(&cli.database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        info!(applied, "database migrations applied");
    }

    let pool = DbPool::new(PoolConfig::new(&cli.database_url).with_max_size(2))
        .await
        .wrap_err("failed to build database pool")?;
    let sweeper = CompletedAtSweeper::new(
        Arc::new(DieselOrderHistoryRepository::new(pool)),
        CompletedAtBackfill,
    )
    .with_batch_size(cli.batch_size);

    match sweeper.sweep().await {
        Ok(report) => {
            println!("{}", json!({ "ok": true, "updated": report.updated }));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(
                updated_before_failure = err.updated_before_failure,
                error = %err,
                "backfill aborted"
            );
            println!("{}", json!({ "ok": false, "error": err.to_string() }));
            Ok(ExitCode::FAILURE)
        }
    }
}
