//! Messhall Store - the attendance record store port
//!
//! Defines the keyed document store the attendance service writes through:
//! - `get` / `merge` for plain reads and merge writes
//! - `merge_if` for the atomic check-and-set that mark-present requires
//! - `subscribe` for watch-based record feeds
//!
//! Ships one reference backend, [`MemoryRecordStore`], whose per-key entry
//! locking makes `merge_if` a single atomic unit.

pub mod memory;
pub mod subscription;

pub use memory::MemoryRecordStore;
pub use subscription::{RecordEvent, RecordSubscription};

use async_trait::async_trait;
use messhall_types::{AttendanceRecord, Precondition, RecordKey, RecordPatch, StoreError};

/// Result of a conditional merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The guard held; the patch was written. Carries the record after the
    /// write.
    Applied(AttendanceRecord),
    /// The guard failed; nothing was written. Carries the record that
    /// preempted the write so the caller can tell why.
    Preempted(AttendanceRecord),
}

/// Keyed store of per-resident-per-day attendance documents.
///
/// Records are created implicitly on first write and never deleted. Every
/// write is a merge that only raises flags, so implementations never need
/// delete or replace semantics.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Read the record for `key`, or `None` if nothing was ever written.
    async fn get(&self, key: &RecordKey) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Merge `patch` into the record for `key` unconditionally, creating the
    /// record if needed. Returns the record after the write.
    async fn merge(
        &self,
        key: &RecordKey,
        patch: RecordPatch,
    ) -> Result<AttendanceRecord, StoreError>;

    /// Merge `patch` only if `guard` holds against the current record.
    ///
    /// Guard evaluation and the write are one atomic unit per key: two
    /// racing calls with the same guard see one `Applied` and one
    /// `Preempted`, never two `Applied`.
    async fn merge_if(
        &self,
        key: &RecordKey,
        guard: Precondition,
        patch: RecordPatch,
    ) -> Result<MergeOutcome, StoreError>;

    /// Open a live feed for one record. The feed carries the current state
    /// immediately and a new event after every write. Dropping the handle
    /// releases the feed.
    fn subscribe(&self, key: &RecordKey) -> RecordSubscription;
}
