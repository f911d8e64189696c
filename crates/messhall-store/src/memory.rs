//! In-memory record store
//!
//! Reference backend used by tests and single-process deployments. Each key
//! owns one map slot; dashmap's entry locking makes every read-modify-write
//! on a slot a single atomic unit, which is what `merge_if` relies on.

use crate::subscription::{RecordEvent, RecordSubscription};
use crate::{MergeOutcome, RecordStore};
use async_trait::async_trait;
use dashmap::DashMap;
use messhall_types::{AttendanceRecord, Precondition, RecordKey, RecordPatch, StoreError};
use tokio::sync::watch;

#[derive(Debug)]
struct Slot {
    record: Option<AttendanceRecord>,
    feed: watch::Sender<RecordEvent>,
}

impl Slot {
    fn new() -> Self {
        let (feed, _) = watch::channel(Ok(None));
        Self { record: None, feed }
    }
}

/// Keyed in-memory store with watch-based feeds.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    slots: DashMap<RecordKey, Slot>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live feeds on one key. Zero after every subscriber has
    /// dropped its handle.
    #[must_use]
    pub fn subscriber_count(&self, key: &RecordKey) -> usize {
        self.slots
            .get(key)
            .map_or(0, |slot| slot.feed.receiver_count())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &RecordKey) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.slots.get(key).and_then(|slot| slot.record))
    }

    async fn merge(
        &self,
        key: &RecordKey,
        patch: RecordPatch,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut slot = self.slots.entry(key.clone()).or_insert_with(Slot::new);
        let mut record = slot.record.unwrap_or_default();
        record.apply(&patch);
        slot.record = Some(record);
        slot.feed.send_replace(Ok(Some(record)));
        tracing::debug!(%key, ?patch, "record merged");
        Ok(record)
    }

    async fn merge_if(
        &self,
        key: &RecordKey,
        guard: Precondition,
        patch: RecordPatch,
    ) -> Result<MergeOutcome, StoreError> {
        // The entry guard is held across check and write; racing callers
        // serialize here.
        let mut slot = self.slots.entry(key.clone()).or_insert_with(Slot::new);
        let current = slot.record.unwrap_or_default();
        if !guard.holds(&current) {
            tracing::debug!(%key, ?patch, "conditional merge preempted");
            return Ok(MergeOutcome::Preempted(current));
        }
        let mut record = current;
        record.apply(&patch);
        slot.record = Some(record);
        slot.feed.send_replace(Ok(Some(record)));
        tracing::debug!(%key, ?patch, "conditional merge applied");
        Ok(MergeOutcome::Applied(record))
    }

    fn subscribe(&self, key: &RecordKey) -> RecordSubscription {
        let slot = self.slots.entry(key.clone()).or_insert_with(Slot::new);
        RecordSubscription::new(slot.feed.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use messhall_types::{FlagRef, Meal, ResidentId};
    use pretty_assertions::assert_eq;

    fn key() -> RecordKey {
        RecordKey::new(
            ResidentId::new("a@x.edu"),
            NaiveDate::from_ymd_opt(2026, 8, 26).unwrap(),
        )
    }

    fn marked_guard(meal: Meal) -> Precondition {
        Precondition::all_clear([FlagRef::present(meal), FlagRef::opt_out(meal)])
    }

    #[tokio::test]
    async fn get_returns_none_before_first_write() {
        let store = MemoryRecordStore::new();
        assert_eq!(store.get(&key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn merge_creates_the_record_implicitly() {
        let store = MemoryRecordStore::new();
        let record = store
            .merge(&key(), RecordPatch::opt_out(Meal::Dinner))
            .await
            .unwrap();
        assert!(record.opted_out(Meal::Dinner));
        assert_eq!(store.get(&key()).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn merge_if_applies_once_then_preempts() {
        let store = MemoryRecordStore::new();
        let guard = marked_guard(Meal::Lunch);
        let patch = RecordPatch::present(Meal::Lunch);

        let first = store
            .merge_if(&key(), guard.clone(), patch.clone())
            .await
            .unwrap();
        assert!(matches!(first, MergeOutcome::Applied(r) if r.present(Meal::Lunch)));

        let second = store.merge_if(&key(), guard, patch).await.unwrap();
        assert!(matches!(second, MergeOutcome::Preempted(r) if r.present(Meal::Lunch)));
    }

    #[tokio::test]
    async fn racing_conditional_merges_apply_exactly_once() {
        let store = std::sync::Arc::new(MemoryRecordStore::new());
        let run = |store: std::sync::Arc<MemoryRecordStore>| async move {
            store
                .merge_if(
                    &key(),
                    marked_guard(Meal::Breakfast),
                    RecordPatch::present(Meal::Breakfast),
                )
                .await
                .unwrap()
        };

        let (a, b) = tokio::join!(run(store.clone()), run(store.clone()));
        let applied = [a, b]
            .iter()
            .filter(|o| matches!(o, MergeOutcome::Applied(_)))
            .count();
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn feed_carries_current_state_then_changes() {
        let store = MemoryRecordStore::new();
        let mut sub = store.subscribe(&key());
        assert_eq!(sub.current(), Ok(None));

        store
            .merge(&key(), RecordPatch::present(Meal::Snacks))
            .await
            .unwrap();
        let event = sub.changed().await.unwrap().unwrap().unwrap();
        assert!(event.present(Meal::Snacks));
    }

    #[tokio::test]
    async fn dropping_the_handle_releases_the_feed() {
        let store = MemoryRecordStore::new();
        let sub = store.subscribe(&key());
        assert_eq!(store.subscriber_count(&key()), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(&key()), 0);
    }
}
