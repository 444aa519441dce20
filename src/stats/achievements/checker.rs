//! Achievement checking logic
//!
//! Pure functions over a requirement and a user's stats. Exhaustive over
//! [`Requirement`], so there is no "unknown type" case at evaluation time.

use serde::Serialize;

use super::requirement::Requirement;
use crate::stats::models::UserStats;

/// Whether `stats` satisfies `requirement`. All thresholds are inclusive.
pub fn evaluate(requirement: &Requirement, stats: &UserStats) -> bool {
    match requirement {
        Requirement::LessonsCompletedAtLeast { count } => stats.lessons_completed >= *count,
        Requirement::ModuleLessonsAtLeast { module_id, count } => {
            stats.module_lessons(module_id) >= *count
        }
        Requirement::ModuleCompleted { module_id } => stats.is_module_completed(module_id),
        Requirement::PerfectScoresAtLeast { count } => stats.perfect_scores >= *count,
        Requirement::AverageScoreAtLeast { score } => stats.avg_score >= *score,
        Requirement::StreakAtLeast { days } => stats.current_streak >= *days,
        Requirement::VideosWatchedAtLeast { count } => stats.videos_watched >= *count,
        Requirement::AllModulesCompletedAtLeast { count } => {
            stats.completed_module_count() >= *count
        }
    }
}

/// How far a user is towards a requirement, for progress bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: u32,
    pub target: u32,
}

impl Progress {
    /// Completion ratio in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        (f64::from(self.current) / f64::from(self.target)).min(1.0)
    }
}

/// Progress of `stats` towards `requirement`.
///
/// Counts are capped at the target. The average score is reported as-is,
/// and module completion is a single step.
pub fn progress(requirement: &Requirement, stats: &UserStats) -> Progress {
    let capped = |current: u32, target: u32| Progress {
        current: current.min(target),
        target,
    };

    match requirement {
        Requirement::LessonsCompletedAtLeast { count } => capped(stats.lessons_completed, *count),
        Requirement::ModuleLessonsAtLeast { module_id, count } => {
            capped(stats.module_lessons(module_id), *count)
        }
        Requirement::ModuleCompleted { module_id } => Progress {
            current: u32::from(stats.is_module_completed(module_id)),
            target: 1,
        },
        Requirement::PerfectScoresAtLeast { count } => capped(stats.perfect_scores, *count),
        Requirement::AverageScoreAtLeast { score } => Progress {
            current: stats.avg_score,
            target: *score,
        },
        Requirement::StreakAtLeast { days } => capped(stats.current_streak, *days),
        Requirement::VideosWatchedAtLeast { count } => capped(stats.videos_watched, *count),
        Requirement::AllModulesCompletedAtLeast { count } => {
            capped(stats.completed_module_count(), *count)
        }
    }
}
