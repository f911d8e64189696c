//! Messhall Types - domain vocabulary for the attendance core
//!
//! Defines the types shared by every other crate in the workspace:
//! - Meals and the per-meal cutoff table
//! - Resident identifiers and record keys
//! - The attendance record and its merge-style write primitives
//! - The error taxonomy and the four-state `Resource` lifecycle union

pub mod error;
pub mod meal;
pub mod patch;
pub mod record;
pub mod resource;
pub mod windows;

pub use error::{AttendanceError, ErrorClass, StoreError};
pub use meal::{Meal, ParseMealError};
pub use patch::{FlagKind, FlagRef, Precondition, RecordPatch};
pub use record::{AttendanceRecord, MealState, RecordKey, ResidentId};
pub use resource::Resource;
pub use windows::{MealWindows, FALLBACK_CUTOFF_MINUTES};
