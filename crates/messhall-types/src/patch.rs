//! Merge-style write primitives for the record store
//!
//! All attendance writes only ever raise flags, so a write is a set of flag
//! references plus, for conditional writes, a precondition the store
//! evaluates atomically with the merge.

use crate::meal::Meal;
use crate::record::AttendanceRecord;

/// Which of the two flag families a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    /// A `present[meal]` flag.
    Present,
    /// An `optedOut[meal]` flag.
    OptOut,
}

/// Reference to one boolean in an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagRef {
    /// The meal slot.
    pub meal: Meal,
    /// Presence or opt-out.
    pub kind: FlagKind,
}

impl FlagRef {
    /// Reference the presence flag for `meal`.
    #[inline]
    #[must_use]
    pub fn present(meal: Meal) -> Self {
        Self {
            meal,
            kind: FlagKind::Present,
        }
    }

    /// Reference the opt-out flag for `meal`.
    #[inline]
    #[must_use]
    pub fn opt_out(meal: Meal) -> Self {
        Self {
            meal,
            kind: FlagKind::OptOut,
        }
    }

    /// Read this flag out of a record.
    #[inline]
    #[must_use]
    pub fn is_set(&self, record: &AttendanceRecord) -> bool {
        match self.kind {
            FlagKind::Present => record.present(self.meal),
            FlagKind::OptOut => record.opted_out(self.meal),
        }
    }
}

/// A merge write: every listed flag is raised to true. Raising a flag that is
/// already true is a harmless overwrite, so patches are idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    flags: Vec<FlagRef>,
}

impl RecordPatch {
    /// Patch that marks `meal` present.
    #[inline]
    #[must_use]
    pub fn present(meal: Meal) -> Self {
        Self {
            flags: vec![FlagRef::present(meal)],
        }
    }

    /// Patch that opts out of `meal`.
    #[inline]
    #[must_use]
    pub fn opt_out(meal: Meal) -> Self {
        Self {
            flags: vec![FlagRef::opt_out(meal)],
        }
    }

    /// The flags this patch raises.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> &[FlagRef] {
        &self.flags
    }
}

/// Guard evaluated by the store in the same atomic unit as the merge it
/// protects. This is what turns mark-present from read-then-write into a
/// single check-and-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Always passes.
    None,
    /// Passes only while every listed flag is still false.
    AllClear(Vec<FlagRef>),
}

impl Precondition {
    /// Guard requiring every flag in `flags` to be clear.
    #[inline]
    #[must_use]
    pub fn all_clear(flags: impl IntoIterator<Item = FlagRef>) -> Self {
        Self::AllClear(flags.into_iter().collect())
    }

    /// Evaluate against a record snapshot.
    #[must_use]
    pub fn holds(&self, record: &AttendanceRecord) -> bool {
        match self {
            Precondition::None => true,
            Precondition::AllClear(flags) => flags.iter().all(|flag| !flag.is_set(record)),
        }
    }
}
