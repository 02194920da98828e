//! In-memory order-history store for backfill tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{BackfillStore, BackfillStoreError};
use crate::domain::{CompletedAtPatch, CompletedAtValue, OrderHistoryId, OrderHistoryRecord};

#[derive(Default)]
struct State {
    records: BTreeMap<OrderHistoryId, OrderHistoryRecord>,
    fetch_limits: Vec<usize>,
    commit_sizes: Vec<usize>,
    fail_commit_number: Option<usize>,
    fail_fetch: bool,
}

/// Order-history collection held in memory.
///
/// `ServerTimestamp` patches resolve to the store's `server_now` so tests
/// can assert the stored value.
pub struct InMemoryOrderHistory {
    server_now: DateTime<Utc>,
    state: Mutex<State>,
}

impl InMemoryOrderHistory {
    /// Empty store whose server clock reads `server_now`.
    pub fn new(server_now: DateTime<Utc>) -> Self {
        Self {
            server_now,
            state: Mutex::new(State::default()),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: OrderHistoryRecord) {
        self.lock().records.insert(record.id.clone(), record);
    }

    /// Insert `count` legacy records with neither timestamp set.
    pub fn seed_legacy(&self, count: usize) {
        let mut state = self.lock();
        for index in 0..count {
            let id = OrderHistoryId::new(format!("history-{index:05}"));
            state.records.insert(
                id.clone(),
                OrderHistoryRecord {
                    id,
                    completed_at: None,
                    archived_at: None,
                },
            );
        }
    }

    /// Make the `number`th commit (1-based) fail.
    pub fn fail_commit(&self, number: usize) {
        self.lock().fail_commit_number = Some(number);
    }

    /// Make every fetch fail.
    pub fn fail_fetches(&self) {
        self.lock().fail_fetch = true;
    }

    /// Current copy of one record.
    pub fn record(&self, id: &str) -> Option<OrderHistoryRecord> {
        self.lock().records.get(&OrderHistoryId::new(id)).cloned()
    }

    /// Records still missing `completed_at`.
    pub fn pending_count(&self) -> usize {
        self.lock()
            .records
            .values()
            .filter(|record| record.completed_at.is_none())
            .count()
    }

    /// Limits passed to each fetch, in order.
    pub fn fetch_limits(&self) -> Vec<usize> {
        self.lock().fetch_limits.clone()
    }

    /// Patch counts of each successful commit, in order.
    pub fn commit_sizes(&self) -> Vec<usize> {
        self.lock().commit_sizes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("order history mutex"),
        }
    }
}

#[async_trait]
impl BackfillStore<OrderHistoryRecord, CompletedAtPatch> for InMemoryOrderHistory {
    async fn fetch_pending(
        &self,
        limit: usize,
    ) -> Result<Vec<OrderHistoryRecord>, BackfillStoreError> {
        let mut state = self.lock();
        state.fetch_limits.push(limit);
        if state.fail_fetch {
            return Err(BackfillStoreError::query("fixture fetch failure"));
        }
        Ok(state
            .records
            .values()
            .filter(|record| record.completed_at.is_none())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn commit(&self, patches: &[CompletedAtPatch]) -> Result<(), BackfillStoreError> {
        let mut state = self.lock();
        let number = state.commit_sizes.len() + 1;
        if state.fail_commit_number == Some(number) {
            return Err(BackfillStoreError::commit("fixture commit failure"));
        }
        for patch in patches {
            let value = match patch.completed_at {
                CompletedAtValue::Archived(at) => at,
                CompletedAtValue::ServerTimestamp => self.server_now,
            };
            if let Some(record) = state.records.get_mut(&patch.id) {
                record.completed_at = Some(value);
            }
        }
        state.commit_sizes.push(patches.len());
        Ok(())
    }
}
