//! Routine statistics: completion rates, streaks, and the composite
//! success score.
//!
//! A "perfect day" is a day on which every sub-target of the routine is
//! completed; a day with zero sub-targets is never perfect. Streaks only
//! count days inside `[start_date, end_date]`.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::model::routine::Routine;
use crate::model::EntityId;
use crate::stats::percentage;

/// Weight of overall completion in the composite success score.
pub const PROGRESS_WEIGHT: f64 = 0.7;
/// Weight of current-streak consistency in the composite success score.
pub const STREAK_WEIGHT: f64 = 0.3;

/// Aggregate routine metrics, recomputed from the record on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoutineStats {
    pub total_sub_targets: usize,
    /// Inclusive day count of the routine range.
    pub total_days: u32,
    /// Percent of sub-targets completed today.
    pub daily_completion_rate: f64,
    /// Percent of all `(day, sub-target)` checks completed over the range.
    pub overall_progress: f64,
    /// Consecutive perfect days ending at `min(today, end_date)`.
    pub current_streak: u32,
    /// Longest run of perfect days anywhere in the range.
    pub longest_streak: u32,
    /// Mean daily completion percentage across the whole range.
    pub average_daily_success: f64,
    /// `PROGRESS_WEIGHT * overall + STREAK_WEIGHT * streak ratio`, in
    /// [0, 100] and monotonic in both inputs.
    pub success_score: f64,
}

/// Metrics for one sub-target considered alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubTargetStats {
    /// Completed days as a percent of the range.
    pub success_rate: f64,
    /// Longest run of consecutive completed days.
    pub best_streak: u32,
    pub completed_days: u32,
    pub total_days: u32,
}

pub fn routine_stats(routine: &Routine, today: NaiveDate) -> RoutineStats {
    let total_sub_targets = routine.sub_targets.len();
    let total_days = routine.total_days();

    let completed: HashSet<(NaiveDate, EntityId)> = routine
        .daily_progress
        .iter()
        .filter(|row| row.completed)
        .map(|row| (row.date, row.sub_target_id))
        .collect();
    let completed_on = |day: NaiveDate| {
        routine
            .sub_targets
            .iter()
            .filter(|st| completed.contains(&(day, st.id)))
            .count()
    };
    let perfect = |day: NaiveDate| total_sub_targets > 0 && completed_on(day) == total_sub_targets;

    let daily_completion_rate = percentage(completed_on(today), total_sub_targets);

    let checks_done = routine.daily_progress.iter().filter(|row| row.completed).count();
    let overall_progress = percentage(checks_done, total_sub_targets * total_days as usize);

    let mut current_streak = 0u32;
    let streak_end = routine.end_date.min(today);
    if streak_end >= routine.start_date {
        let mut cursor = streak_end;
        while perfect(cursor) {
            current_streak += 1;
            if cursor == routine.start_date {
                break;
            }
            cursor = cursor - Duration::days(1);
        }
    }

    let mut longest_streak = 0u32;
    let mut run = 0u32;
    let mut success_sum = 0.0;
    for day in range_days(routine) {
        if perfect(day) {
            run += 1;
            longest_streak = longest_streak.max(run);
        } else {
            run = 0;
        }
        success_sum += percentage(completed_on(day), total_sub_targets);
    }
    let average_daily_success = if total_days == 0 {
        0.0
    } else {
        success_sum / f64::from(total_days)
    };

    let streak_ratio = if total_days == 0 {
        0.0
    } else {
        (f64::from(current_streak) / f64::from(total_days)).min(1.0)
    };
    let success_score = PROGRESS_WEIGHT * overall_progress + STREAK_WEIGHT * streak_ratio * 100.0;

    RoutineStats {
        total_sub_targets,
        total_days,
        daily_completion_rate,
        overall_progress,
        current_streak,
        longest_streak,
        average_daily_success,
        success_score,
    }
}

/// Stats for one sub-target, or `None` when the routine does not own it.
pub fn sub_target_stats(routine: &Routine, sub_target_id: EntityId) -> Option<SubTargetStats> {
    routine.sub_target(sub_target_id)?;

    let total_days = routine.total_days();
    let completed: HashSet<NaiveDate> = routine
        .daily_progress
        .iter()
        .filter(|row| row.sub_target_id == sub_target_id && row.completed)
        .map(|row| row.date)
        .collect();

    let mut completed_days = 0u32;
    let mut best_streak = 0u32;
    let mut run = 0u32;
    for day in range_days(routine) {
        if completed.contains(&day) {
            completed_days += 1;
            run += 1;
            best_streak = best_streak.max(run);
        } else {
            run = 0;
        }
    }

    Some(SubTargetStats {
        success_rate: percentage(completed_days as usize, total_days as usize),
        best_streak,
        completed_days,
        total_days,
    })
}

fn range_days(routine: &Routine) -> impl Iterator<Item = NaiveDate> + '_ {
    routine
        .start_date
        .iter_days()
        .take_while(|day| *day <= routine.end_date)
}
