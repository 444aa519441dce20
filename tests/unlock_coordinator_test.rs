//! Integration tests for UnlockCoordinator: scenarios, idempotence and
//! at-most-once unlocking under concurrent checks

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tempfile::tempdir;

use lingua_progress::stats::ProgressManager;
use lingua_progress::stats::achievements::{
    AchievementDefinition, Requirement, UnlockCoordinator, parse_catalog_json,
};
use lingua_progress::store::{AchievementCatalog, ActivityStore, MemoryStore};

use common::{
    completion, fast_retry, first_lesson, memory_coordinator, ms, now, standard_lessons,
};

fn average_80() -> AchievementDefinition {
    AchievementDefinition::new("high-achiever", Requirement::AverageScoreAtLeast { score: 80 }, 400)
}

async fn record_all(store: &Arc<MemoryStore>, records: Vec<lingua_progress::ActivityRecord>) {
    for record in records {
        store.record_completion(record).await.unwrap();
    }
}

#[tokio::test]
async fn test_single_lesson_unlocks_once_and_pays_once() {
    let (store, coordinator) = memory_coordinator(standard_lessons(), vec![first_lesson(50)]);
    record_all(&store, vec![completion("u1", "grammar-1", Some(70), ms(0, 9))]).await;

    let unlocked = coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked;
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].id, "first-lesson");

    let summary = store.points_summary("u1").await.unwrap();
    assert_eq!(summary.total_points, 50);
    assert_eq!(summary.achievements_unlocked, 1);
}

#[tokio::test]
async fn test_repeated_checks_are_idempotent() {
    let (store, coordinator) = memory_coordinator(standard_lessons(), vec![first_lesson(50)]);
    record_all(&store, vec![completion("u1", "grammar-1", None, ms(0, 9))]).await;

    assert_eq!(coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked.len(), 1);
    for _ in 0..3 {
        assert!(coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked.is_empty());
    }

    // Completing the same lesson again changes nothing either
    record_all(&store, vec![completion("u1", "grammar-1", Some(100), ms(0, 10))]).await;
    assert!(coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked.is_empty());

    assert_eq!(store.points_summary("u1").await.unwrap().total_points, 50);
    assert_eq!(store.unlock_records("u1").unwrap().len(), 1);
}

#[tokio::test]
async fn test_average_threshold_is_inclusive() {
    let (store, coordinator) = memory_coordinator(standard_lessons(), vec![average_80()]);
    record_all(
        &store,
        vec![
            completion("u1", "grammar-1", Some(70), ms(0, 9)),
            completion("u1", "grammar-2", Some(90), ms(0, 10)),
            completion("u2", "grammar-1", Some(79), ms(0, 9)),
        ],
    )
    .await;

    let stats = coordinator.user_stats("u1", now()).await.unwrap();
    assert_eq!(stats.avg_score, 80);
    let unlocked = coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked;
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].id, "high-achiever");

    assert!(coordinator.check_and_unlock_at("u2", now()).await.unwrap().unlocked.is_empty());
}

#[tokio::test]
async fn test_users_are_independent() {
    let (store, coordinator) = memory_coordinator(standard_lessons(), vec![first_lesson(50)]);
    record_all(
        &store,
        vec![
            completion("u1", "grammar-1", None, ms(0, 9)),
            completion("u2", "reading-1", None, ms(0, 9)),
        ],
    )
    .await;

    assert_eq!(coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked.len(), 1);
    assert_eq!(coordinator.check_and_unlock_at("u2", now()).await.unwrap().unlocked.len(), 1);
    assert!(coordinator.check_and_unlock_at("u3", now()).await.unwrap().unlocked.is_empty());
    assert_eq!(store.points_summary("u2").await.unwrap().total_points, 50);
}

#[tokio::test]
async fn test_module_and_streak_achievements() {
    let definitions = vec![
        AchievementDefinition::new(
            "grammar-master",
            Requirement::ModuleCompleted {
                module_id: "grammar".to_string(),
            },
            600,
        ),
        AchievementDefinition::new("week-warrior", Requirement::StreakAtLeast { days: 3 }, 200),
    ];
    let (store, coordinator) = memory_coordinator(standard_lessons(), definitions);

    record_all(
        &store,
        (1..=4)
            .map(|i| completion("u1", &format!("grammar-{i}"), Some(90), ms(3 - i as i64 + 1, 9)))
            .collect(),
    )
    .await;
    // Days 3, 2, 1 and today: streak of 4, grammar one lesson short
    let unlocked = coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked;
    let ids: Vec<_> = unlocked.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["week-warrior"]);

    record_all(&store, vec![completion("u1", "grammar-5", Some(90), ms(0, 11))]).await;
    let unlocked = coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked;
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].id, "grammar-master");
    assert_eq!(store.points_summary("u1").await.unwrap().total_points, 800);
}

#[tokio::test]
async fn test_invalid_catalog_entries_skipped_rest_unlock() {
    let loaded = parse_catalog_json(
        r#"[
            {"id": "early-bird", "points": 100, "requirement": {"type": "time_of_day", "hour": 9}},
            {"id": "first-lesson", "points": 60, "requirement": {"type": "lessons_completed", "count": 1}},
            {"id": "scholar", "points": 150, "requirement": {"type": "lessons_completed"}},
            {"id": "first-lesson", "points": 999, "requirement": {"type": "lessons_completed", "count": 1}}
        ]"#,
    )
    .unwrap();
    assert_eq!(loaded.definitions.len(), 1);
    assert_eq!(loaded.rejected.len(), 3);

    let (store, coordinator) = memory_coordinator(standard_lessons(), loaded.definitions);
    record_all(&store, vec![completion("u1", "reading-1", None, ms(0, 9))]).await;

    let unlocked = coordinator.check_and_unlock_at("u1", now()).await.unwrap().unlocked;
    assert_eq!(unlocked.len(), 1);
    assert_eq!(store.points_summary("u1").await.unwrap().total_points, 60);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_unlock_at_most_once_in_memory() {
    let scholar = AchievementDefinition::new("scholar", Requirement::LessonsCompletedAtLeast { count: 2 }, 150);
    let (store, coordinator) = memory_coordinator(standard_lessons(), vec![first_lesson(50), scholar]);
    record_all(
        &store,
        vec![
            completion("u1", "grammar-1", None, ms(0, 9)),
            completion("u1", "grammar-2", None, ms(0, 10)),
        ],
    )
    .await;

    let winners = run_concurrent_checks(&coordinator, "u1", 16).await;

    assert_eq!(winners.len(), 2, "each achievement is reported by exactly one check");
    assert_eq!(winners.iter().collect::<HashSet<_>>().len(), 2);
    let summary = store.points_summary("u1").await.unwrap();
    assert_eq!(summary.total_points, 200);
    assert_eq!(summary.achievements_unlocked, 2);
    assert_eq!(store.unlock_records("u1").unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_unlock_at_most_once_in_sqlite() {
    let dir = tempdir().unwrap();
    let manager = ProgressManager::with_path(&dir.path().join("progress.db")).unwrap();
    let activity = manager.activity_store();
    activity.import_lessons(&standard_lessons()).unwrap();
    activity
        .record_completion(completion("u1", "grammar-1", Some(100), ms(0, 9)))
        .await
        .unwrap();

    let coordinator = manager.coordinator_with_retry(vec![first_lesson(60)], fast_retry());
    let winners = run_concurrent_checks(&coordinator, "u1", 16).await;

    assert_eq!(winners, vec!["first-lesson".to_string()]);
    let ledger = manager.ledger(Vec::new());
    let summary = ledger.points_summary("u1").await.unwrap();
    assert_eq!(summary.total_points, 60);
    assert_eq!(summary.achievements_unlocked, 1);
    assert_eq!(ledger.unlock_records("u1").unwrap().len(), 1);
}

/// Fire `n` checks for one user at once; returns every id reported as newly unlocked
async fn run_concurrent_checks(coordinator: &UnlockCoordinator, user: &str, n: usize) -> Vec<String> {
    let handles = (0..n).map(|_| {
        let coordinator = coordinator.clone();
        let user = user.to_string();
        tokio::spawn(async move { coordinator.check_and_unlock_at(&user, now()).await })
    });

    join_all(handles)
        .await
        .into_iter()
        .flat_map(|joined| joined.unwrap().unwrap().unlocked)
        .map(|def| def.id)
        .collect()
}
