//! Messhall Core - attendance state machine and identity-scan pipeline
//!
//! The rule-bearing core of the dining-facility attendance system:
//! - [`AttendanceService`]: the only writer of attendance records; enforces
//!   duplicate, opt-out, and cutoff rules
//! - [`ScanSession`]: staff-side state machine from camera frame to
//!   attendance write
//! - [`AttendanceObserver`]: republishes record changes as tagged snapshots
//! - Clock and identity-resolver ports for the ambient collaborators
//!
//! # Example
//!
//! ```rust,ignore
//! use messhall_core::prelude::*;
//! use messhall_store::MemoryRecordStore;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let store = Arc::new(MemoryRecordStore::new());
//! let identity = Arc::new(StaticIdentity::signed_in("a@x.edu".into()));
//! let service = Arc::new(AttendanceService::new(store, identity));
//!
//! let session = ScanSession::new(service, Arc::new(NoopAck));
//! // feed camera frames:
//! // session.process_frame(frame).await;
//! # }
//! ```

pub mod clock;
pub mod identity;
pub mod observer;
pub mod service;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use identity::{IdentityResolver, StaticIdentity};
pub use observer::{AttendanceObserver, AttendanceUpdates};
pub use service::AttendanceService;
pub use session::{AckSink, NoopAck, ScanOutcome, ScanSession, SessionConfig, SessionPhase};

// The domain vocabulary travels with the core
pub use messhall_types::{
    AttendanceError, AttendanceRecord, ErrorClass, Meal, MealState, MealWindows, RecordKey,
    Resource, ResidentId,
};

/// Prelude for wiring the core up.
pub mod prelude {
    //! Common imports for working with the attendance core
    pub use crate::{
        AckSink, AttendanceError, AttendanceObserver, AttendanceRecord, AttendanceService, Clock,
        IdentityResolver, Meal, MealWindows, NoopAck, Resource, ResidentId, ScanOutcome,
        ScanSession, SessionPhase, StaticIdentity,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
