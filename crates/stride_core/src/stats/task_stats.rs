//! Task collection breakdown by status and due-date bucket.

use chrono::{DateTime, Duration, Utc};

use crate::model::task::Task;

/// One-pass breakdown of a task collection relative to `now`.
///
/// Due-date buckets compare UTC calendar days, not instants, and only
/// pending tasks contribute to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Pending tasks whose due day is before today.
    pub overdue: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
}

pub fn task_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);

    let mut stats = TaskStats::default();
    for task in tasks {
        stats.total += 1;
        if task.is_completed() {
            stats.completed += 1;
            continue;
        }
        stats.pending += 1;

        let Some(due_day) = task.due_day() else {
            continue;
        };
        if due_day < today {
            stats.overdue += 1;
        } else if due_day == today {
            stats.due_today += 1;
        } else if due_day == tomorrow {
            stats.due_tomorrow += 1;
        }
    }
    stats
}
