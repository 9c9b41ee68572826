//! Goal domain model.
//!
//! # Responsibility
//! - Define the canonical goal record and its timeframe enum.
//! - Define the insert/update shapes accepted by `GoalStore`.
//!
//! # Invariants
//! - `target` is strictly positive.
//! - Goals store no progress counter; progress is derived from completed
//!   tasks of the matching category inside the current timeframe window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::task::Category;
use crate::model::{EntityId, ValidationError};

/// Rolling window a goal is measured against, anchored to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTimeframe {
    Weekly,
    Monthly,
    Yearly,
}

/// Canonical goal record.
///
/// `color` is a display hint passed through untouched; the core never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    /// Completed tasks required to finish the goal. Always > 0.
    pub target: u32,
    pub timeframe: GoalTimeframe,
    pub category: Category,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for `GoalStore::add_goal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub target: u32,
    pub timeframe: GoalTimeframe,
    pub category: Category,
    pub color: String,
}

impl GoalDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.target == 0 {
            return Err(ValidationError::TargetNotPositive);
        }
        Ok(())
    }
}

/// Update shape for `GoalStore::update_goal`: exactly the mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub target: Option<u32>,
    pub timeframe: Option<GoalTimeframe>,
    pub category: Option<Category>,
    pub color: Option<String>,
}

impl GoalPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle);
            }
        }
        if self.target == Some(0) {
            return Err(ValidationError::TargetNotPositive);
        }
        Ok(())
    }

    /// Merges this patch into `goal`. The caller stamps `updated_at`.
    pub(crate) fn apply(self, goal: &mut Goal) {
        if let Some(title) = self.title {
            goal.title = title;
        }
        if let Some(description) = self.description {
            goal.description = description;
        }
        if let Some(target) = self.target {
            goal.target = target;
        }
        if let Some(timeframe) = self.timeframe {
            goal.timeframe = timeframe;
        }
        if let Some(category) = self.category {
            goal.category = category;
        }
        if let Some(color) = self.color {
            goal.color = color;
        }
    }
}
