//! Routine domain model: a dated habit plan with sub-targets and per-day
//! completion records.
//!
//! # Responsibility
//! - Define the routine aggregate and its owned sub-entities.
//! - Define the insert/update shapes accepted by `RoutineStore`.
//!
//! # Invariants
//! - `start_date <= end_date`.
//! - Every `DailyProgress.sub_target_id` references a sub-target owned by
//!   the same routine; deleting a sub-target cascades its progress rows.
//! - At most one `DailyProgress` row per `(date, sub_target_id)` pair.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EntityId, ValidationError};

/// One habit tracked inside a routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTarget {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Completion record for one sub-target on one calendar day.
///
/// Keyed by `(date, sub_target_id)`; absence of a row means "not completed",
/// not "unknown". `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub sub_target_id: EntityId,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Canonical routine record. Owns its sub-targets and progress exclusively;
/// nothing is shared across routines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub sub_targets: Vec<SubTarget>,
    #[serde(default)]
    pub daily_progress: Vec<DailyProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Routine {
    /// Inclusive day count of the routine range.
    ///
    /// 0 only for a record whose range invariant was violated outside the
    /// store (hand-edited storage); stats treat that as an empty range
    /// rather than panicking.
    pub fn total_days(&self) -> u32 {
        u32::try_from((self.end_date - self.start_date).num_days() + 1).unwrap_or(0)
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    pub fn sub_target(&self, sub_target_id: EntityId) -> Option<&SubTarget> {
        self.sub_targets.iter().find(|st| st.id == sub_target_id)
    }

    /// Closed-world completion lookup: `false` when no row exists.
    pub fn progress_on(&self, sub_target_id: EntityId, date: NaiveDate) -> bool {
        self.daily_progress
            .iter()
            .find(|row| row.sub_target_id == sub_target_id && row.date == date)
            .map(|row| row.completed)
            .unwrap_or(false)
    }
}

/// Insert shape for `RoutineStore::add_routine`.
///
/// Sub-targets and progress always start empty and are managed through the
/// dedicated sub-entity operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RoutineDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.start_date > self.end_date {
            return Err(ValidationError::DateRangeInverted {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// Update shape for `RoutineStore::update_routine`: exactly the mutable
/// fields. Range validity is re-checked against the merged record, since a
/// patch may move either bound alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutinePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RoutinePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle);
            }
        }
        Ok(())
    }

    /// Merges this patch into `routine`. The caller re-validates the date
    /// range and stamps `updated_at`.
    pub(crate) fn apply(self, routine: &mut Routine) {
        if let Some(title) = self.title {
            routine.title = title;
        }
        if let Some(description) = self.description {
            routine.description = description;
        }
        if let Some(start_date) = self.start_date {
            routine.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            routine.end_date = end_date;
        }
    }
}

/// Insert shape for `RoutineStore::add_sub_target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTargetDraft {
    pub name: String,
    pub description: Option<String>,
}

impl SubTargetDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Update shape for `RoutineStore::update_sub_target`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubTargetPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl SubTargetPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyName);
            }
        }
        Ok(())
    }

    /// Merges this patch into `sub_target`. The caller stamps timestamps.
    pub(crate) fn apply(self, sub_target: &mut SubTarget) {
        if let Some(name) = self.name {
            sub_target.name = name;
        }
        if let Some(description) = self.description {
            sub_target.description = description;
        }
    }
}
