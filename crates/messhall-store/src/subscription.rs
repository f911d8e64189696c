//! Watch-based record feeds

use messhall_types::{AttendanceRecord, StoreError};
use tokio::sync::watch;

/// One event on a record feed: the record state after a write (`None` while
/// the document does not exist yet), or a transient backend fault. A fault
/// does not terminate the feed; later writes keep arriving.
pub type RecordEvent = Result<Option<AttendanceRecord>, StoreError>;

/// Live feed of one record's state.
///
/// Scoped resource: dropping the handle releases the underlying feed. The
/// feed keeps only the latest state, so a slow reader sees the newest write
/// rather than a backlog.
#[derive(Debug)]
pub struct RecordSubscription {
    rx: watch::Receiver<RecordEvent>,
}

impl RecordSubscription {
    /// Wrap a watch receiver produced by a store backend.
    #[must_use]
    pub fn new(rx: watch::Receiver<RecordEvent>) -> Self {
        Self { rx }
    }

    /// The current state, without waiting. Marks it seen, so a following
    /// [`changed`](Self::changed) waits for the next write.
    #[must_use]
    pub fn current(&mut self) -> RecordEvent {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next state change. `None` once the store has dropped the
    /// feed (backend shut down).
    pub async fn changed(&mut self) -> Option<RecordEvent> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
