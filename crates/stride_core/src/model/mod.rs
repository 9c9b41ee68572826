//! Domain model for tasks, goals, and routines.
//!
//! # Responsibility
//! - Define the plain value records the stores own and persist.
//! - Define the draft/patch input shapes and their validation rules.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId` that is never reused.
//! - Records carry no back-references beyond the daily-progress foreign key.
//! - Drafts and patches are the only write shapes the stores accept.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use uuid::Uuid;

pub mod goal;
pub mod routine;
pub mod task;

/// Stable identifier for every stored record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = Uuid;

/// Rejected draft or patch input.
///
/// Validation runs before any state change, so a failed write leaves the
/// collection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is blank after trimming.
    EmptyTitle,
    /// Sub-target name is blank after trimming.
    EmptyName,
    /// Goal target must be at least one completed task.
    TargetNotPositive,
    /// Routine range would end before it starts.
    DateRangeInverted { start: NaiveDate, end: NaiveDate },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::EmptyName => write!(f, "sub-target name must not be blank"),
            Self::TargetNotPositive => write!(f, "goal target must be greater than zero"),
            Self::DateRangeInverted { start, end } => {
                write!(f, "start date {start} is after end date {end}")
            }
        }
    }
}

impl Error for ValidationError {}
