//! Shared fixtures and store doubles for the core integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use messhall_core::session::AckSink;
use messhall_core::FixedClock;
use messhall_store::{
    MemoryRecordStore, MergeOutcome, RecordEvent, RecordStore, RecordSubscription,
};
use messhall_types::{
    AttendanceRecord, Precondition, RecordKey, RecordPatch, ResidentId, StoreError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
}

pub fn resident() -> ResidentId {
    ResidentId::new("a@x.edu")
}

/// Clock pinned to `day()` at hh:mm.
pub fn clock_at(hour: u32, minute: u32) -> Arc<FixedClock> {
    Arc::new(FixedClock(NaiveDateTime::new(
        day(),
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
    )))
}

/// Acknowledgement sink that counts how often it fired.
#[derive(Debug, Default)]
pub struct CountingAck(AtomicUsize);

impl CountingAck {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl AckSink for CountingAck {
    fn acknowledge(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Memory store wrapper that counts conditional merges (one per submission)
/// and can park them on a semaphore to hold a submission in flight.
#[derive(Debug)]
pub struct InstrumentedStore {
    inner: MemoryRecordStore,
    merge_if_calls: AtomicUsize,
    hold: Option<Arc<Semaphore>>,
}

impl InstrumentedStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryRecordStore::new(),
            merge_if_calls: AtomicUsize::new(0),
            hold: None,
        }
    }

    /// Every conditional merge must take a permit from `gate` first.
    pub fn held_by(gate: Arc<Semaphore>) -> Self {
        Self {
            hold: Some(gate),
            ..Self::new()
        }
    }

    pub fn merge_if_calls(&self) -> usize {
        self.merge_if_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryRecordStore {
        &self.inner
    }
}

#[async_trait]
impl RecordStore for InstrumentedStore {
    async fn get(&self, key: &RecordKey) -> Result<Option<AttendanceRecord>, StoreError> {
        self.inner.get(key).await
    }

    async fn merge(
        &self,
        key: &RecordKey,
        patch: RecordPatch,
    ) -> Result<AttendanceRecord, StoreError> {
        self.inner.merge(key, patch).await
    }

    async fn merge_if(
        &self,
        key: &RecordKey,
        guard: Precondition,
        patch: RecordPatch,
    ) -> Result<MergeOutcome, StoreError> {
        self.merge_if_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.hold {
            gate.acquire().await.unwrap().forget();
        }
        self.inner.merge_if(key, guard, patch).await
    }

    fn subscribe(&self, key: &RecordKey) -> RecordSubscription {
        self.inner.subscribe(key)
    }
}

/// Store whose backend is unreachable.
#[derive(Debug, Default)]
pub struct DownStore;

fn offline() -> StoreError {
    StoreError::Unavailable("store offline".into())
}

#[async_trait]
impl RecordStore for DownStore {
    async fn get(&self, _key: &RecordKey) -> Result<Option<AttendanceRecord>, StoreError> {
        Err(offline())
    }

    async fn merge(
        &self,
        _key: &RecordKey,
        _patch: RecordPatch,
    ) -> Result<AttendanceRecord, StoreError> {
        Err(offline())
    }

    async fn merge_if(
        &self,
        _key: &RecordKey,
        _guard: Precondition,
        _patch: RecordPatch,
    ) -> Result<MergeOutcome, StoreError> {
        Err(offline())
    }

    fn subscribe(&self, _key: &RecordKey) -> RecordSubscription {
        let (tx, rx) = watch::channel(Err(offline()));
        drop(tx);
        RecordSubscription::new(rx)
    }
}

/// Store whose feed is driven by the test, for fault-injection on the
/// observer path. Reads and writes delegate to a memory store.
#[derive(Debug)]
pub struct ScriptedFeedStore {
    inner: MemoryRecordStore,
    feed: watch::Sender<RecordEvent>,
}

impl ScriptedFeedStore {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(Ok(None));
        Self {
            inner: MemoryRecordStore::new(),
            feed,
        }
    }

    pub fn push(&self, event: RecordEvent) {
        self.feed.send_replace(event);
    }
}

#[async_trait]
impl RecordStore for ScriptedFeedStore {
    async fn get(&self, key: &RecordKey) -> Result<Option<AttendanceRecord>, StoreError> {
        self.inner.get(key).await
    }

    async fn merge(
        &self,
        key: &RecordKey,
        patch: RecordPatch,
    ) -> Result<AttendanceRecord, StoreError> {
        self.inner.merge(key, patch).await
    }

    async fn merge_if(
        &self,
        key: &RecordKey,
        guard: Precondition,
        patch: RecordPatch,
    ) -> Result<MergeOutcome, StoreError> {
        self.inner.merge_if(key, guard, patch).await
    }

    fn subscribe(&self, _key: &RecordKey) -> RecordSubscription {
        RecordSubscription::new(self.feed.subscribe())
    }
}
