//! Shared fixtures for progress integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use lingua_progress::stats::achievements::{
    AchievementDefinition, Requirement, RewardRetry, UnlockCoordinator,
};
use lingua_progress::store::MemoryStore;
use lingua_progress::{ActivityRecord, Lesson};

/// Fixed clock for tests: 2024-05-10 12:00 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Milliseconds at `hour`:00 UTC, `days_ago` days before the test clock
pub fn ms(days_ago: i64, hour: u32) -> i64 {
    (today() - chrono::Duration::days(days_ago))
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

/// `count` lessons `<module>-1..=<module>-count` in order
pub fn module_lessons(module_id: &str, count: i64) -> Vec<Lesson> {
    (1..=count)
        .map(|i| Lesson::new(format!("{module_id}-{i}"), module_id, i))
        .collect()
}

/// Five grammar lessons and three reading lessons
pub fn standard_lessons() -> Vec<Lesson> {
    let mut lessons = module_lessons("grammar", 5);
    lessons.extend(module_lessons("reading", 3));
    lessons
}

pub fn completion(user: &str, lesson_id: &str, score: Option<u32>, at: i64) -> ActivityRecord {
    let module_id = lesson_id.rsplit_once('-').map(|(m, _)| m).unwrap_or(lesson_id);
    ActivityRecord::lesson(user, lesson_id, module_id, score, at)
}

pub fn first_lesson(points: u32) -> AchievementDefinition {
    AchievementDefinition::new("first-lesson", Requirement::LessonsCompletedAtLeast { count: 1 }, points)
}

/// Coordinator over an in-memory store with a fast retry policy
pub fn memory_coordinator(
    lessons: Vec<Lesson>,
    definitions: Vec<AchievementDefinition>,
) -> (Arc<MemoryStore>, UnlockCoordinator) {
    let store = Arc::new(MemoryStore::new(lessons, definitions));
    let coordinator = UnlockCoordinator::new(store.clone(), store.clone()).with_retry(fast_retry());
    (store, coordinator)
}

pub fn fast_retry() -> RewardRetry {
    RewardRetry {
        attempts: 3,
        backoff: Duration::from_millis(1),
    }
}

/// Every ordering of `items`
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}
