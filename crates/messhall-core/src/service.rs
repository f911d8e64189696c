//! Attendance service
//!
//! The only writer of attendance records. Enforces the duplicate and opt-out
//! rules for check-in and the cutoff window for opt-out.
//!
//! Mark-present is an atomic conditional write: the "not already marked, not
//! opted out" check and the flag raise happen in one store transaction, so
//! two staff devices racing on the same resident produce exactly one success
//! and one conflict.

use crate::clock::{Clock, SystemClock};
use crate::identity::IdentityResolver;
use chrono::NaiveDate;
use messhall_store::{MergeOutcome, RecordStore};
use messhall_types::{
    AttendanceError, FlagRef, Meal, MealWindows, Precondition, RecordKey, RecordPatch, ResidentId,
};
use std::sync::Arc;

/// Attendance rule engine over a record store.
pub struct AttendanceService<S> {
    store: Arc<S>,
    windows: MealWindows,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn IdentityResolver>,
}

impl<S: RecordStore> AttendanceService<S> {
    /// Service with the default cutoff table and the system clock.
    #[must_use]
    pub fn new(store: Arc<S>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            store,
            windows: MealWindows::default(),
            clock: Arc::new(SystemClock),
            identity,
        }
    }

    /// Replace the cutoff table.
    #[must_use]
    pub fn with_windows(mut self, windows: MealWindows) -> Self {
        self.windows = windows;
        self
    }

    /// Replace the clock (tests pin it).
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The cutoff table in force.
    #[inline]
    #[must_use]
    pub fn windows(&self) -> &MealWindows {
        &self.windows
    }

    /// Record `resident` as present at `meal` on `date`.
    ///
    /// # Errors
    /// - [`AttendanceError::AlreadyMarked`] if presence was already recorded
    /// - [`AttendanceError::OptedOut`] if the resident opted out of the meal
    /// - [`AttendanceError::StoreUnavailable`] on a store fault
    ///
    /// Check-in has no cutoff: staff can admit a resident at any time of day.
    /// Only opt-out is time-gated.
    pub async fn mark_present(
        &self,
        resident: &ResidentId,
        date: NaiveDate,
        meal: Meal,
    ) -> Result<(), AttendanceError> {
        let key = RecordKey::new(resident.clone(), date);
        let guard = Precondition::all_clear([FlagRef::present(meal), FlagRef::opt_out(meal)]);
        match self
            .store
            .merge_if(&key, guard, RecordPatch::present(meal))
            .await?
        {
            MergeOutcome::Applied(_) => {
                tracing::info!(%resident, %date, %meal, "attendance marked");
                Ok(())
            }
            MergeOutcome::Preempted(record) => {
                // The duplicate check outranks the opt-out check, matching
                // the order the rules are stated in.
                if record.present(meal) {
                    tracing::info!(%resident, %date, %meal, "duplicate check-in refused");
                    Err(AttendanceError::AlreadyMarked)
                } else {
                    tracing::info!(%resident, %date, %meal, "entry denied, resident opted out");
                    Err(AttendanceError::OptedOut)
                }
            }
        }
    }

    /// Record an opt-out of `meal` on `date` for `resident`.
    ///
    /// # Errors
    /// - [`AttendanceError::TooLate`] at or past the meal's cutoff minute
    /// - [`AttendanceError::StoreUnavailable`] on a store fault
    ///
    /// Deliberately does not check prior state: repeating an opt-out is a
    /// harmless true-over-true overwrite, and an opt-out after a check-in is
    /// left to the record invariantly holding present.
    pub async fn opt_out(
        &self,
        resident: &ResidentId,
        date: NaiveDate,
        meal: Meal,
    ) -> Result<(), AttendanceError> {
        let minute = self.clock.minute_of_day();
        if !self.windows.allows_opt_out(meal, minute) {
            tracing::info!(%resident, %date, %meal, minute, "opt-out past cutoff refused");
            return Err(AttendanceError::TooLate);
        }
        self.store
            .merge(&RecordKey::new(resident.clone(), date), RecordPatch::opt_out(meal))
            .await?;
        tracing::info!(%resident, %date, %meal, "opt-out recorded");
        Ok(())
    }

    /// Check `resident` in for `meal` today; today comes from the service
    /// clock. The staff-scanner path.
    pub async fn mark_present_today(
        &self,
        resident: &ResidentId,
        meal: Meal,
    ) -> Result<(), AttendanceError> {
        self.mark_present(resident, self.clock.today(), meal).await
    }

    /// Opt the signed-in resident out of `meal` today. The resident-device
    /// path.
    ///
    /// # Errors
    /// [`AttendanceError::NotAuthenticated`] when no identity resolves, plus
    /// everything [`opt_out`](Self::opt_out) can fail with.
    pub async fn opt_out_today(&self, meal: Meal) -> Result<(), AttendanceError> {
        let resident = self
            .identity
            .current_resident()
            .ok_or(AttendanceError::NotAuthenticated)?;
        self.opt_out(&resident, self.clock.today(), meal).await
    }
}
