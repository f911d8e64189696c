//! The four daily meal slots

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed daily meal slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Afternoon snacks
    Snacks,
    /// Evening meal
    Dinner,
}

impl Meal {
    /// All meals in serving order.
    pub const ALL: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Snacks, Meal::Dinner];

    /// Document field name for the presence flag.
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Snacks => "snacks",
            Meal::Dinner => "dinner",
        }
    }

    /// Document field name for the opt-out flag.
    #[inline]
    #[must_use]
    pub fn opt_out_key(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast_optout",
            Meal::Lunch => "lunch_optout",
            Meal::Snacks => "snacks_optout",
            Meal::Dinner => "dinner_optout",
        }
    }

    /// Slot preselected on the staff scanner before the operator picks one.
    #[inline]
    #[must_use]
    pub fn default_for_scanning() -> Self {
        Meal::Breakfast
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A meal key that matched none of the four slots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown meal key: {0}")]
pub struct ParseMealError(pub String);

impl FromStr for Meal {
    type Err = ParseMealError;

    /// Case-insensitive parse of a meal key ("Breakfast", "lunch", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "snacks" => Ok(Meal::Snacks),
            "dinner" => Ok(Meal::Dinner),
            _ => Err(ParseMealError(s.to_string())),
        }
    }
}
