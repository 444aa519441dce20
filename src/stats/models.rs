//! Derived statistics
//!
//! `UserStats` is never the source of truth. It is always recomputed from a
//! user's activity records, so it can be thrown away and rebuilt at any time.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::levels::LevelProgress;

/// Summary of a user's completion activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Distinct lessons completed
    pub lessons_completed: u32,
    /// Distinct lessons whose latest score is 100
    pub perfect_scores: u32,
    /// Mean of the latest score of each scored lesson, rounded half up
    pub avg_score: u32,
    /// Distinct lessons completed per module
    pub module_progress: BTreeMap<String, u32>,
    /// One entry per catalog module
    pub modules_completed: BTreeMap<String, bool>,
    /// Share of each catalog module completed, 0-100 rounded half up
    pub module_percent: BTreeMap<String, u32>,
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Most recent day with any activity, up to today
    pub last_active: Option<NaiveDate>,
    /// Distinct videos watched
    pub videos_watched: u32,
    /// XP from the latest attempt of each completed lesson
    pub xp: u32,
}

impl UserStats {
    /// Lessons completed in one module
    pub fn module_lessons(&self, module_id: &str) -> u32 {
        self.module_progress.get(module_id).copied().unwrap_or(0)
    }

    /// Whether every lesson of a module is complete
    pub fn is_module_completed(&self, module_id: &str) -> bool {
        self.modules_completed.get(module_id).copied().unwrap_or(false)
    }

    /// Completion percentage of one module, 0 for modules not in the catalog
    pub fn module_percentage(&self, module_id: &str) -> u32 {
        self.module_percent.get(module_id).copied().unwrap_or(0)
    }

    /// Number of modules marked completed
    pub fn completed_module_count(&self) -> u32 {
        self.modules_completed.values().filter(|done| **done).count() as u32
    }

    pub fn level(&self) -> LevelProgress {
        LevelProgress::new(self.xp)
    }
}
