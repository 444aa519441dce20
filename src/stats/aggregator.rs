//! Turns raw completion events into [`UserStats`]
//!
//! Pure and total: no I/O, never fails, and the result does not depend on
//! the order of the input records.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use super::levels::XpRewards;
use super::models::UserStats;
use super::streaks::StreakInfo;
use crate::domain::{ActivityKind, ActivityRecord, Catalog};

/// Aggregate a user's activity into statistics as of `today`.
///
/// Repeated completions of the same lesson count once; the record with the
/// latest `completed_at` supplies the score. Lessons missing from the catalog
/// still count towards `lessons_completed` but not towards any module.
pub fn aggregate(records: &[ActivityRecord], catalog: &Catalog, today: NaiveDate) -> UserStats {
    let mut stats = UserStats::default();
    let mut score_sum: u64 = 0;
    let mut score_count: u64 = 0;

    for record in latest_per_item(records).into_values() {
        match record.kind {
            ActivityKind::Video => stats.videos_watched += 1,
            ActivityKind::Lesson => {
                stats.lessons_completed += 1;
                stats.xp += XpRewards::lesson(record.score);

                if let Some(score) = record.score {
                    if score == 100 {
                        stats.perfect_scores += 1;
                    }
                    score_sum += u64::from(score);
                    score_count += 1;
                }

                match catalog.module_of(&record.lesson_id) {
                    Some(module_id) => {
                        *stats.module_progress.entry(module_id.to_string()).or_insert(0) += 1;
                    }
                    None => tracing::warn!(
                        lesson_id = %record.lesson_id,
                        user_id = %record.user_id,
                        "Completed lesson not found in catalog, skipping module progress"
                    ),
                }
            }
        }
    }

    if score_count > 0 {
        stats.avg_score = ((2 * score_sum + score_count) / (2 * score_count)) as u32;
    }

    for module in catalog.modules() {
        let done_lessons = stats.module_lessons(&module.id) as usize;
        let done = module.total_lessons > 0 && done_lessons >= module.total_lessons;
        stats.modules_completed.insert(module.id.clone(), done);
        stats
            .module_percent
            .insert(module.id.clone(), percent(done_lessons, module.total_lessons));
    }

    let streak = StreakInfo::from_records(records, today);
    stats.current_streak = streak.current;
    stats.longest_streak = streak.longest;
    stats.last_active = streak.last_active;
    stats
}

/// `done / total` as a percentage rounded half up, 0 for an empty module
fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((200 * done + total) / (2 * total)) as u32
}

/// Ids of lessons the user has completed at least once
pub fn completed_lessons(records: &[ActivityRecord]) -> HashSet<String> {
    records
        .iter()
        .filter(|r| r.is_lesson())
        .map(|r| r.lesson_id.clone())
        .collect()
}

/// Keep one record per (kind, id): the latest by timestamp.
///
/// Equal timestamps fall back to score, then module id, so the winner never
/// depends on input order.
fn latest_per_item(records: &[ActivityRecord]) -> HashMap<(ActivityKind, &str), &ActivityRecord> {
    let mut latest: HashMap<(ActivityKind, &str), &ActivityRecord> = HashMap::new();
    for record in records {
        let key = (record.kind, record.lesson_id.as_str());
        match latest.get(&key) {
            Some(current) if rank(current) >= rank(record) => {}
            _ => {
                latest.insert(key, record);
            }
        }
    }
    latest
}

fn rank(record: &ActivityRecord) -> (i64, Option<u32>, &str) {
    (record.completed_at, record.score, record.module_id.as_str())
}
