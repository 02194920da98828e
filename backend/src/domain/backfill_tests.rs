//! Tests for the batched backfill sweep.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{CompletedAtBackfill, OrderHistoryId, OrderHistoryRecord};
use crate::test_support::InMemoryOrderHistory;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0)
        .single()
        .expect("valid time")
}

#[fixture]
fn store() -> Arc<InMemoryOrderHistory> {
    Arc::new(InMemoryOrderHistory::new(at(20)))
}

fn sweeper(store: &Arc<InMemoryOrderHistory>, batch_size: usize) -> BackfillSweeper<CompletedAtBackfill> {
    BackfillSweeper::new(store.clone(), CompletedAtBackfill).with_batch_size(batch_size)
}

#[rstest]
#[tokio::test]
async fn empty_store_reports_zero(store: Arc<InMemoryOrderHistory>) {
    let report = sweeper(&store, 500).sweep().await.expect("sweep");
    assert_eq!(report, SweepReport::default());
    assert_eq!(store.fetch_limits(), vec![500]);
}

#[rstest]
#[tokio::test]
async fn patches_from_archive_or_server_clock(store: Arc<InMemoryOrderHistory>) {
    store.insert(OrderHistoryRecord {
        id: OrderHistoryId::new("a"),
        completed_at: None,
        archived_at: Some(at(3)),
    });
    store.insert(OrderHistoryRecord {
        id: OrderHistoryId::new("b"),
        completed_at: None,
        archived_at: None,
    });
    store.insert(OrderHistoryRecord {
        id: OrderHistoryId::new("c"),
        completed_at: Some(at(1)),
        archived_at: Some(at(2)),
    });

    let report = sweeper(&store, 500).sweep().await.expect("sweep");

    assert_eq!(report.updated, 2);
    assert_eq!(store.record("a").and_then(|r| r.completed_at), Some(at(3)));
    assert_eq!(store.record("b").and_then(|r| r.completed_at), Some(at(20)));
    assert_eq!(store.record("c").and_then(|r| r.completed_at), Some(at(1)));
}

#[rstest]
#[case(1200, 500, vec![500, 500, 200])]
#[case(1000, 500, vec![500, 500])]
#[case(3, 2, vec![2, 1])]
#[tokio::test]
async fn commits_in_batches(
    store: Arc<InMemoryOrderHistory>,
    #[case] legacy: usize,
    #[case] batch_size: usize,
    #[case] expected_commits: Vec<usize>,
) {
    store.seed_legacy(legacy);

    let report = sweeper(&store, batch_size).sweep().await.expect("sweep");

    assert_eq!(report.updated, legacy);
    assert_eq!(report.batches, expected_commits.len());
    assert_eq!(store.commit_sizes(), expected_commits);
    assert_eq!(store.pending_count(), 0);
}

#[rstest]
#[tokio::test]
async fn second_sweep_is_a_no_op(store: Arc<InMemoryOrderHistory>) {
    store.seed_legacy(7);
    let sweeper = sweeper(&store, 5);
    sweeper.sweep().await.expect("first sweep");

    let report = sweeper.sweep().await.expect("second sweep");

    assert_eq!(report.updated, 0);
}

#[rstest]
#[tokio::test]
async fn failed_commit_keeps_earlier_batches(store: Arc<InMemoryOrderHistory>) {
    store.seed_legacy(1200);
    store.fail_commit(2);

    let err = sweeper(&store, 500)
        .sweep()
        .await
        .expect_err("second commit fails");

    assert_eq!(err.updated_before_failure, 500);
    assert!(matches!(err.source, BackfillStoreError::Commit { .. }));
    assert_eq!(store.pending_count(), 700);
}

#[rstest]
#[tokio::test]
async fn failed_fetch_surfaces_error_text(store: Arc<InMemoryOrderHistory>) {
    store.fail_fetches();

    let err = sweeper(&store, 500).sweep().await.expect_err("fetch fails");

    assert_eq!(err.updated_before_failure, 0);
    assert_eq!(
        err.to_string(),
        "backfill store query failed: fixture fetch failure"
    );
}

#[rstest]
fn zero_batch_size_is_clamped(store: Arc<InMemoryOrderHistory>) {
    assert_eq!(sweeper(&store, 0).batch_size(), 1);
}

#[rstest]
#[tokio::test]
async fn command_port_runs_a_sweep(store: Arc<InMemoryOrderHistory>) {
    store.seed_legacy(2);
    let command: Arc<dyn BackfillCommand> = Arc::new(sweeper(&store, 500));

    let report = command.run().await.expect("sweep");

    assert_eq!(report.updated, 2);
}
