//! Wall-clock port
//!
//! Cutoffs and the implicit "today" both come from a clock the service owns,
//! so policy decisions stay testable with a pinned time.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Today's calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Minutes since midnight, the unit the cutoff table speaks.
    fn minute_of_day(&self) -> u16 {
        let time = self.now().time();
        (time.hour() * 60 + time.minute()) as u16
    }
}

/// System clock in local time. Residents experience cutoffs in the facility's
/// local day, not UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock pinned to one instant, for policy tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
