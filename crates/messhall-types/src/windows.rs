//! Per-meal opt-out cutoffs

use crate::meal::Meal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cutoff applied to meal keys that match none of the four slots
/// (end of day, 23:59).
pub const FALLBACK_CUTOFF_MINUTES: u16 = 1439;

/// Static cutoff table, minutes from midnight. A resident may opt out of a
/// meal strictly before its cutoff minute; at or past it the opt-out is
/// refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealWindows {
    /// Breakfast cutoff (default 07:00).
    pub breakfast: u16,
    /// Lunch cutoff (default 12:00).
    pub lunch: u16,
    /// Snacks cutoff (default 16:00).
    pub snacks: u16,
    /// Dinner cutoff (default 19:00).
    pub dinner: u16,
}

impl Default for MealWindows {
    fn default() -> Self {
        Self {
            breakfast: 7 * 60,
            lunch: 12 * 60,
            snacks: 16 * 60,
            dinner: 19 * 60,
        }
    }
}

impl MealWindows {
    /// Cutoff minute for a meal.
    #[inline]
    #[must_use]
    pub fn cutoff(&self, meal: Meal) -> u16 {
        match meal {
            Meal::Breakfast => self.breakfast,
            Meal::Lunch => self.lunch,
            Meal::Snacks => self.snacks,
            Meal::Dinner => self.dinner,
        }
    }

    /// Cutoff minute for a raw meal key as it appears in a stored document
    /// or a display layer's schedule table, where keys arrive as strings
    /// rather than [`Meal`] values. Unrecognized keys fall back to end of
    /// day so a stale client never refuses an opt-out early.
    #[must_use]
    pub fn cutoff_for_key(&self, key: &str) -> u16 {
        match Meal::from_str(key) {
            Ok(meal) => self.cutoff(meal),
            Err(_) => FALLBACK_CUTOFF_MINUTES,
        }
    }

    /// Whether an opt-out request at `minute_of_day` is still in time.
    #[inline]
    #[must_use]
    pub fn allows_opt_out(&self, meal: Meal, minute_of_day: u16) -> bool {
        minute_of_day < self.cutoff(meal)
    }
}
