//! In-memory collaborator implementation
//!
//! Used by tests and by hosts that keep progress in process. Conditional
//! creates and keyed rewards happen under a single mutex, which gives the
//! same at-most-once guarantee as the SQLite primary key.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{AchievementCatalog, ActivityStore, PointsSummary, UnlockRecord, validate_record};
use crate::domain::{ActivityRecord, Catalog, Lesson};
use crate::error::StorageError;
use crate::stats::achievements::AchievementDefinition;

#[derive(Default)]
struct State {
    lessons: Vec<Lesson>,
    activity: Vec<ActivityRecord>,
    // keyed by (user_id, achievement_id)
    unlocks: BTreeMap<(String, String), UnlockRecord>,
    points: HashMap<String, PointsSummary>,
    add_points_failures: u32,
    read_failures: u32,
}

/// Activity store and achievement ledger held in memory
pub struct MemoryStore {
    definitions: Vec<AchievementDefinition>,
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new(lessons: Vec<Lesson>, definitions: Vec<AchievementDefinition>) -> Self {
        Self {
            definitions,
            state: Mutex::new(State {
                lessons,
                ..State::default()
            }),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, StorageError> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn check_read(state: &mut State) -> Result<(), StorageError> {
        if state.read_failures > 0 {
            state.read_failures -= 1;
            return Err(StorageError::Unavailable("injected read failure".to_string()));
        }
        Ok(())
    }

    /// Make the next `count` calls to `add_points` fail
    pub fn fail_next_add_points(&self, count: u32) -> Result<(), StorageError> {
        self.state()?.add_points_failures = count;
        Ok(())
    }

    /// Make the next `count` reads (activity, catalog, unlock ids) fail
    pub fn fail_next_reads(&self, count: u32) -> Result<(), StorageError> {
        self.state()?.read_failures = count;
        Ok(())
    }

    /// All unlock records of a user, ordered by achievement id
    pub fn unlock_records(&self, user_id: &str) -> Result<Vec<UnlockRecord>, StorageError> {
        let state = self.state()?;
        Ok(state
            .unlocks
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn activity_records(&self, user_id: &str) -> Result<Vec<ActivityRecord>, StorageError> {
        let mut state = self.state()?;
        Self::check_read(&mut state)?;
        Ok(state
            .activity
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn catalog(&self) -> Result<Catalog, StorageError> {
        let mut state = self.state()?;
        Self::check_read(&mut state)?;
        Ok(Catalog::from_lessons(state.lessons.clone()))
    }

    async fn record_completion(&self, record: ActivityRecord) -> Result<(), StorageError> {
        validate_record(&record)?;
        self.state()?.activity.push(record);
        Ok(())
    }
}

#[async_trait]
impl AchievementCatalog for MemoryStore {
    async fn definitions(&self) -> Result<Vec<AchievementDefinition>, StorageError> {
        Ok(self.definitions.clone())
    }

    async fn unlocked_ids(&self, user_id: &str) -> Result<HashSet<String>, StorageError> {
        let mut state = self.state()?;
        Self::check_read(&mut state)?;
        Ok(state
            .unlocks
            .values()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.achievement_id.clone())
            .collect())
    }

    async fn create_unlock_if_absent(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: i64,
    ) -> Result<bool, StorageError> {
        let mut state = self.state()?;
        let key = (user_id.to_string(), achievement_id.to_string());
        if state.unlocks.contains_key(&key) {
            return Ok(false);
        }
        state.unlocks.insert(
            key,
            UnlockRecord {
                user_id: user_id.to_string(),
                achievement_id: achievement_id.to_string(),
                unlocked_at,
                rewarded: false,
            },
        );
        Ok(true)
    }

    async fn add_points(
        &self,
        user_id: &str,
        achievement_id: &str,
        delta: u32,
    ) -> Result<bool, StorageError> {
        let mut state = self.state()?;
        if state.add_points_failures > 0 {
            state.add_points_failures -= 1;
            return Err(StorageError::Unavailable("injected add_points failure".to_string()));
        }

        let key = (user_id.to_string(), achievement_id.to_string());
        match state.unlocks.get_mut(&key) {
            Some(record) if !record.rewarded => record.rewarded = true,
            _ => return Ok(false),
        }

        let summary = state.points.entry(user_id.to_string()).or_default();
        summary.total_points += u64::from(delta);
        summary.achievements_unlocked += 1;
        Ok(true)
    }

    async fn pending_rewards(&self, user_id: &str) -> Result<Vec<String>, StorageError> {
        let state = self.state()?;
        Ok(state
            .unlocks
            .values()
            .filter(|r| r.user_id == user_id && !r.rewarded)
            .map(|r| r.achievement_id.clone())
            .collect())
    }

    async fn points_summary(&self, user_id: &str) -> Result<PointsSummary, StorageError> {
        let state = self.state()?;
        Ok(state.points.get(user_id).copied().unwrap_or_default())
    }
}
