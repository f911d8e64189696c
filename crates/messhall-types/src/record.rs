//! Attendance records and their keys
//!
//! One record exists per (resident, calendar date). The record itself carries
//! only the eight flags; the key lives outside the document, matching the
//! persisted shape of the external store.

use crate::meal::Meal;
use crate::patch::{FlagKind, RecordPatch};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a resident (the identity-code payload, typically an
/// email address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidentId(String);

impl ResidentId {
    /// Wrap an identifier string.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (never valid as a scan payload).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResidentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Key of one attendance record: (resident, calendar date).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Whose attendance.
    pub resident: ResidentId,
    /// Which day; a new date implicitly starts a fresh all-false record.
    pub date: NaiveDate,
}

impl RecordKey {
    /// Build a key.
    #[inline]
    #[must_use]
    pub fn new(resident: ResidentId, date: NaiveDate) -> Self {
        Self { resident, date }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // NaiveDate renders as ISO-8601
        write!(f, "{}/{}", self.resident, self.date)
    }
}

/// The state a single meal is in for one resident and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealState {
    /// Neither marked present nor opted out.
    Unset,
    /// Checked in; final for the rest of the day.
    Present,
    /// Opted out; sticky until midnight.
    OptedOut,
}

/// One resident's attendance flags for one day.
///
/// Serializes to the flat persisted document: four presence flags keyed by
/// meal name and four opt-out flags keyed by `<meal>_optout`. A missing field
/// deserializes as `false`, so partial documents read back cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceRecord {
    /// Present at breakfast.
    pub breakfast: bool,
    /// Present at lunch.
    pub lunch: bool,
    /// Present at snacks.
    pub snacks: bool,
    /// Present at dinner.
    pub dinner: bool,
    /// Opted out of breakfast.
    #[serde(rename = "breakfast_optout")]
    pub breakfast_opt_out: bool,
    /// Opted out of lunch.
    #[serde(rename = "lunch_optout")]
    pub lunch_opt_out: bool,
    /// Opted out of snacks.
    #[serde(rename = "snacks_optout")]
    pub snacks_opt_out: bool,
    /// Opted out of dinner.
    #[serde(rename = "dinner_optout")]
    pub dinner_opt_out: bool,
}

impl AttendanceRecord {
    /// Whether the resident is marked present for `meal`.
    #[inline]
    #[must_use]
    pub fn present(&self, meal: Meal) -> bool {
        match meal {
            Meal::Breakfast => self.breakfast,
            Meal::Lunch => self.lunch,
            Meal::Snacks => self.snacks,
            Meal::Dinner => self.dinner,
        }
    }

    /// Whether the resident opted out of `meal`.
    #[inline]
    #[must_use]
    pub fn opted_out(&self, meal: Meal) -> bool {
        match meal {
            Meal::Breakfast => self.breakfast_opt_out,
            Meal::Lunch => self.lunch_opt_out,
            Meal::Snacks => self.snacks_opt_out,
            Meal::Dinner => self.dinner_opt_out,
        }
    }

    /// Tri-state view of one meal. Present wins if both flags were ever
    /// raised, which the service rules out.
    #[must_use]
    pub fn meal_state(&self, meal: Meal) -> MealState {
        if self.present(meal) {
            MealState::Present
        } else if self.opted_out(meal) {
            MealState::OptedOut
        } else {
            MealState::Unset
        }
    }

    /// Raise the presence flag for `meal`. Flags are only ever raised.
    pub fn set_present(&mut self, meal: Meal) {
        match meal {
            Meal::Breakfast => self.breakfast = true,
            Meal::Lunch => self.lunch = true,
            Meal::Snacks => self.snacks = true,
            Meal::Dinner => self.dinner = true,
        }
    }

    /// Raise the opt-out flag for `meal`. Flags are only ever raised.
    pub fn set_opt_out(&mut self, meal: Meal) {
        match meal {
            Meal::Breakfast => self.breakfast_opt_out = true,
            Meal::Lunch => self.lunch_opt_out = true,
            Meal::Snacks => self.snacks_opt_out = true,
            Meal::Dinner => self.dinner_opt_out = true,
        }
    }

    /// Apply a merge-style patch: every listed flag is raised.
    pub fn apply(&mut self, patch: &RecordPatch) {
        for flag in patch.flags() {
            match flag.kind {
                FlagKind::Present => self.set_present(flag.meal),
                FlagKind::OptOut => self.set_opt_out(flag.meal),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_record_is_all_false() {
        let record = AttendanceRecord::default();
        for meal in Meal::ALL {
            assert_eq!(record.meal_state(meal), MealState::Unset);
        }
    }

    #[test]
    fn flags_only_raise() {
        let mut record = AttendanceRecord::default();
        record.set_present(Meal::Lunch);
        record.set_present(Meal::Lunch);
        assert!(record.present(Meal::Lunch));
        assert!(!record.present(Meal::Breakfast));
    }

    #[test]
    fn meal_state_tracks_flags() {
        let mut record = AttendanceRecord::default();
        record.set_opt_out(Meal::Dinner);
        assert_eq!(record.meal_state(Meal::Dinner), MealState::OptedOut);
        record.set_present(Meal::Breakfast);
        assert_eq!(record.meal_state(Meal::Breakfast), MealState::Present);
    }

    #[test]
    fn serializes_to_persisted_document_shape() {
        let mut record = AttendanceRecord::default();
        record.set_present(Meal::Breakfast);
        record.set_opt_out(Meal::Lunch);

        let doc = serde_json::to_value(record).unwrap();
        assert_eq!(
            doc,
            serde_json::json!({
                "breakfast": true,
                "lunch": false,
                "snacks": false,
                "dinner": false,
                "breakfast_optout": false,
                "lunch_optout": true,
                "snacks_optout": false,
                "dinner_optout": false,
            })
        );
    }

    #[test]
    fn deserializes_partial_document() {
        // Merge-written documents may carry a subset of fields
        let record: AttendanceRecord =
            serde_json::from_str(r#"{"lunch": true, "dinner_optout": true}"#).unwrap();
        assert!(record.present(Meal::Lunch));
        assert!(record.opted_out(Meal::Dinner));
        assert!(!record.present(Meal::Breakfast));
    }

    #[test]
    fn record_key_display_is_resident_slash_iso_date() {
        let key = RecordKey::new(
            ResidentId::new("a@x.edu"),
            NaiveDate::from_ymd_opt(2026, 8, 26).unwrap(),
        );
        assert_eq!(key.to_string(), "a@x.edu/2026-08-26");
    }
}
