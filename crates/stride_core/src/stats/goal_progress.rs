//! Goal progress derived from task completions.
//!
//! Progress is never stored on the goal; it is recounted from the task
//! collection on every call, so there is no second source of truth to
//! drift. A task counts when it is completed, matches the goal's category,
//! and its completion day falls inside the current timeframe window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::model::goal::{Goal, GoalTimeframe};
use crate::model::task::Task;

/// Fraction of the target at which a goal still counts as on track.
pub const ON_TRACK_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalProgressStatus {
    Completed,
    OnTrack,
    Behind,
}

/// Snapshot of a goal's standing inside the current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Matching completed tasks inside the window.
    pub completed_tasks: u32,
    /// Capped at 100.
    pub progress_percentage: f64,
    pub status: GoalProgressStatus,
}

pub fn goal_progress(goal: &Goal, tasks: &[Task], now: DateTime<Utc>) -> GoalProgress {
    let (window_start, window_end) = timeframe_window(goal.timeframe, now.date_naive());

    let completed_tasks = tasks
        .iter()
        .filter(|task| {
            task.is_completed()
                && task.category == goal.category
                && task.completed_at.is_some_and(|at| {
                    let day = at.date_naive();
                    window_start <= day && day <= window_end
                })
        })
        .count() as u32;

    let progress_percentage =
        (f64::from(completed_tasks) / f64::from(goal.target) * 100.0).min(100.0);
    let status = if completed_tasks >= goal.target {
        GoalProgressStatus::Completed
    } else if f64::from(completed_tasks) >= f64::from(goal.target) * ON_TRACK_RATIO {
        GoalProgressStatus::OnTrack
    } else {
        GoalProgressStatus::Behind
    };

    GoalProgress {
        completed_tasks,
        progress_percentage,
        status,
    }
}

/// Inclusive day window for a timeframe, anchored to `today`.
/// Weeks start on Sunday.
fn timeframe_window(timeframe: GoalTimeframe, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match timeframe {
        GoalTimeframe::Weekly => {
            let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
            (start, start + Duration::days(6))
        }
        GoalTimeframe::Monthly => {
            let start = first_of_month(today);
            // 32 days past the 1st always lands in the following month.
            (start, first_of_month(start + Duration::days(32)) - Duration::days(1))
        }
        GoalTimeframe::Yearly => {
            let start = first_of_year(today);
            (start, first_of_year(start + Duration::days(366)) - Duration::days(1))
        }
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.day0()))
}

fn first_of_year(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.ordinal0()))
}

#[cfg(test)]
mod tests {
    use super::{first_of_month, first_of_year, timeframe_window};
    use crate::model::goal::GoalTimeframe;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_window_is_sunday_aligned() {
        // 2026-08-05 is a Wednesday.
        let (start, end) = timeframe_window(GoalTimeframe::Weekly, day(2026, 8, 5));
        assert_eq!(start, day(2026, 8, 2));
        assert_eq!(end, day(2026, 8, 8));

        // A Sunday anchors its own week.
        let (start, end) = timeframe_window(GoalTimeframe::Weekly, day(2026, 8, 2));
        assert_eq!(start, day(2026, 8, 2));
        assert_eq!(end, day(2026, 8, 8));
    }

    #[test]
    fn month_window_handles_short_months_and_leap_years() {
        assert_eq!(first_of_month(day(2026, 2, 17)), day(2026, 2, 1));
        let (start, end) = timeframe_window(GoalTimeframe::Monthly, day(2026, 2, 17));
        assert_eq!((start, end), (day(2026, 2, 1), day(2026, 2, 28)));

        let (start, end) = timeframe_window(GoalTimeframe::Monthly, day(2028, 2, 10));
        assert_eq!((start, end), (day(2028, 2, 1), day(2028, 2, 29)));

        let (start, end) = timeframe_window(GoalTimeframe::Monthly, day(2026, 12, 31));
        assert_eq!((start, end), (day(2026, 12, 1), day(2026, 12, 31)));
    }

    #[test]
    fn year_window_spans_the_calendar_year() {
        assert_eq!(first_of_year(day(2026, 8, 5)), day(2026, 1, 1));
        let (start, end) = timeframe_window(GoalTimeframe::Yearly, day(2028, 6, 15));
        assert_eq!((start, end), (day(2028, 1, 1), day(2028, 12, 31)));
    }
}
