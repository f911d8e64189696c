//! Error taxonomy for attendance operations
//!
//! Errors are returned, never thrown: every service operation yields a
//! `Result` whose error renders as a short operator-readable message.

/// Failure of the record store backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached.
    #[error("attendance store unavailable: {0}")]
    Unavailable(String),
    /// Backend reached but the operation failed.
    #[error("attendance store i/o failed: {0}")]
    Io(String),
}

/// Outcome classification used by callers to decide retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller-side precondition failed (no identity resolved).
    Validation,
    /// The record already rules out the write.
    Conflict,
    /// The wall clock rules out the write.
    TimingPolicy,
    /// Backend fault; safe to retry manually.
    Transient,
}

/// Everything an attendance operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceError {
    /// Presence was already recorded for this meal and day.
    #[error("attendance already marked for this meal")]
    AlreadyMarked,
    /// The resident opted out of this meal; entry is denied for the day.
    #[error("resident has opted out of this meal; entry denied")]
    OptedOut,
    /// The opt-out cutoff for this meal has passed.
    #[error("too late to opt out of this meal")]
    TooLate,
    /// No resident identity could be resolved for the calling device.
    #[error("no resident identity available")]
    NotAuthenticated,
    /// The record store failed; the caller may retry.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl AttendanceError {
    /// Taxonomy bucket for this error.
    #[inline]
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            AttendanceError::NotAuthenticated => ErrorClass::Validation,
            AttendanceError::AlreadyMarked | AttendanceError::OptedOut => ErrorClass::Conflict,
            AttendanceError::TooLate => ErrorClass::TimingPolicy,
            AttendanceError::StoreUnavailable(_) => ErrorClass::Transient,
        }
    }

    /// Whether a manual retry can possibly succeed. Only transient store
    /// faults qualify; conflict and policy errors are terminal for the call.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::Transient)
    }
}
