//! Behaviour tests for the `completed_at` backfill sweep.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pickup_backend::domain::{
    CompletedAtBackfill, CompletedAtSweeper, OrderHistoryId, OrderHistoryRecord, SweepError,
    SweepReport,
};
use pickup_backend::test_support::InMemoryOrderHistory;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct BackfillWorld {
    runtime: Slot<RuntimeHandle>,
    store: Slot<Arc<InMemoryOrderHistory>>,
    archived: Slot<Vec<(String, DateTime<Utc>)>>,
    legacy_ids: Slot<Vec<String>>,
    last_result: Slot<Result<SweepReport, SweepError>>,
}

#[fixture]
fn world() -> BackfillWorld {
    BackfillWorld::default()
}

fn server_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0)
        .single()
        .expect("valid fixed time")
}

impl BackfillWorld {
    fn store(&self) -> Arc<InMemoryOrderHistory> {
        if let Some(store) = self.store.get() {
            return store;
        }
        let store = Arc::new(InMemoryOrderHistory::new(server_now()));
        self.store.set(store.clone());
        self.runtime
            .set(RuntimeHandle(Arc::new(Runtime::new().expect("create runtime"))));
        store
    }

    fn run_sweep(&self) {
        let store = self.store();
        let runtime = self.runtime.get().expect("runtime");
        let sweeper = CompletedAtSweeper::new(store, CompletedAtBackfill);
        self.last_result.set(runtime.0.block_on(sweeper.sweep()));
    }
}

#[given("an order history with {count} archived records missing completed_at")]
fn archived_records(world: &BackfillWorld, count: usize) {
    let store = world.store();
    let mut archived = Vec::with_capacity(count);
    for index in 0..count {
        let id = format!("archived-{index}");
        let hours = i64::try_from(index).expect("small index") + 1;
        let archived_at = server_now() - TimeDelta::hours(hours);
        store.insert(OrderHistoryRecord {
            id: OrderHistoryId::new(id.clone()),
            completed_at: None,
            archived_at: Some(archived_at),
        });
        archived.push((id, archived_at));
    }
    world.archived.set(archived);
}

#[given("an order history with {count} legacy records missing both timestamps")]
fn legacy_records(world: &BackfillWorld, count: usize) {
    world.store().seed_legacy(count);
    world
        .legacy_ids
        .set((0..count).map(|index| format!("history-{index:05}")).collect());
}

#[given("commit number {number} fails")]
fn commit_fails(world: &BackfillWorld, number: usize) {
    world.store().fail_commit(number);
}

#[when("the backfill sweep runs")]
fn the_backfill_sweep_runs(world: &BackfillWorld) {
    world.run_sweep();
}

#[when("the backfill sweep runs again")]
fn the_backfill_sweep_runs_again(world: &BackfillWorld) {
    world.run_sweep();
}

#[then("the sweep reports {count} updated records")]
fn the_sweep_reports(world: &BackfillWorld, count: usize) {
    let result = world.last_result.get().expect("sweep ran");
    let report = result.expect("sweep succeeded");
    assert_eq!(report.updated, count);
}

#[then("the sweep fails after {count} updated records")]
fn the_sweep_fails_after(world: &BackfillWorld, count: usize) {
    let result = world.last_result.get().expect("sweep ran");
    let err = result.expect_err("sweep failed");
    assert_eq!(err.updated_before_failure, count);
}

#[then("every archived record has completed_at equal to archived_at")]
fn archived_records_copied(world: &BackfillWorld) {
    let store = world.store();
    for (id, archived_at) in world.archived.get().expect("archived records seeded") {
        let record = store.record(&id).expect("record exists");
        assert_eq!(record.completed_at, Some(archived_at), "record {id}");
    }
}

#[then("every legacy record has completed_at set to the server time")]
fn legacy_records_stamped(world: &BackfillWorld) {
    let store = world.store();
    for id in world.legacy_ids.get().expect("legacy records seeded") {
        let record = store.record(&id).expect("record exists");
        assert_eq!(record.completed_at, Some(server_now()), "record {id}");
    }
}

#[then("{count} records are still missing completed_at")]
fn records_still_missing(world: &BackfillWorld, count: usize) {
    assert_eq!(world.store().pending_count(), count);
}

#[scenario(
    path = "tests/features/completed_at_backfill.feature",
    name = "archived records copy their archive time"
)]
fn archived_records_copy_their_archive_time(world: BackfillWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/completed_at_backfill.feature",
    name = "unstamped records receive the server time"
)]
fn unstamped_records_receive_the_server_time(world: BackfillWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/completed_at_backfill.feature",
    name = "a second sweep finds nothing to do"
)]
fn a_second_sweep_finds_nothing_to_do(world: BackfillWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/completed_at_backfill.feature",
    name = "a failed batch keeps earlier batches committed"
)]
fn a_failed_batch_keeps_earlier_batches_committed(world: BackfillWorld) {
    drop(world);
}
