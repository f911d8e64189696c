//! Attendance observer
//!
//! Republishes one record's store feed to the UI layer as tagged
//! [`Resource`] snapshots: `Loading` first, then `Success` for the current
//! state and again after every write. A missing record reads as an all-false
//! `Success`, never an `Error`. Transient store faults surface as `Error`
//! snapshots without tearing the feed down.

use crate::identity::IdentityResolver;
use chrono::NaiveDate;
use futures::stream::{self, Stream};
use messhall_store::{RecordStore, RecordSubscription};
use messhall_types::{AttendanceRecord, RecordKey, Resource, ResidentId};
use std::sync::Arc;

/// Factory for record snapshot sequences.
pub struct AttendanceObserver<S> {
    store: Arc<S>,
    identity: Arc<dyn IdentityResolver>,
}

impl<S: RecordStore> AttendanceObserver<S> {
    /// Observer over `store`, resolving the resident-device identity through
    /// `identity`.
    #[must_use]
    pub fn new(store: Arc<S>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { store, identity }
    }

    /// Snapshot sequence for one (resident, date). The store feed it holds
    /// is released when the returned handle drops.
    #[must_use]
    pub fn observe(&self, resident: &ResidentId, date: NaiveDate) -> AttendanceUpdates {
        let key = RecordKey::new(resident.clone(), date);
        tracing::debug!(%key, "attendance observation opened");
        AttendanceUpdates {
            inner: UpdatesInner::Live {
                sub: self.store.subscribe(&key),
                stage: Stage::Opening,
            },
        }
    }

    /// Snapshot sequence for the signed-in resident on `date`. With nobody
    /// signed in the sequence stays idle and emits nothing; an unresolved
    /// identity is not an error here.
    #[must_use]
    pub fn observe_current(&self, date: NaiveDate) -> AttendanceUpdates {
        match self.identity.current_resident() {
            Some(resident) => self.observe(&resident, date),
            None => AttendanceUpdates {
                inner: UpdatesInner::Idle,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Next snapshot is `Loading`.
    Opening,
    /// Next snapshot is the current record state.
    Priming,
    /// Snapshots follow store writes.
    Streaming,
    /// The store dropped the feed; nothing more will arrive.
    Closed,
}

enum UpdatesInner {
    /// No resident identity; never emits.
    Idle,
    Live { sub: RecordSubscription, stage: Stage },
}

/// Push sequence of attendance snapshots.
///
/// Scoped resource: dropping it releases the store subscription. The
/// sequence is unbounded; callers stop by dropping, not by draining.
pub struct AttendanceUpdates {
    inner: UpdatesInner,
}

impl AttendanceUpdates {
    /// Whether this sequence is the idle, identity-less one.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.inner, UpdatesInner::Idle)
    }

    /// Next snapshot. Pends forever on an idle sequence and after the store
    /// closes the feed.
    pub async fn next(&mut self) -> Resource<AttendanceRecord> {
        let UpdatesInner::Live { sub, stage } = &mut self.inner else {
            return std::future::pending().await;
        };
        loop {
            match *stage {
                Stage::Opening => {
                    *stage = Stage::Priming;
                    return Resource::Loading;
                }
                Stage::Priming => {
                    *stage = Stage::Streaming;
                    return match sub.current() {
                        // No document yet reads as a fresh all-false day
                        Ok(record) => Resource::Success(record.unwrap_or_default()),
                        Err(err) => Resource::Error(err.to_string()),
                    };
                }
                Stage::Streaming => match sub.changed().await {
                    Some(Ok(record)) => {
                        return Resource::Success(record.unwrap_or_default());
                    }
                    // Fault snapshot; the subscription itself stays up
                    Some(Err(err)) => return Resource::Error(err.to_string()),
                    None => {
                        tracing::debug!("attendance feed closed by the store");
                        *stage = Stage::Closed;
                    }
                },
                Stage::Closed => return std::future::pending().await,
            }
        }
    }

    /// Adapt the sequence to a [`Stream`] of snapshots.
    pub fn into_stream(self) -> impl Stream<Item = Resource<AttendanceRecord>> {
        stream::unfold(self, |mut updates| async move {
            let snapshot = updates.next().await;
            Some((snapshot, updates))
        })
    }
}
