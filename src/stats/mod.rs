//! Progress tracking for Lingua
//!
//! Completion events are stored in a SQLite database
//! (`~/.lingua-progress/progress.db`), aggregated into [`UserStats`] on
//! demand, and checked against the achievement catalog.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   records    ┌──────────────────┐
//! │  ActivityStore   │ ───────────▶ │    aggregate()   │
//! └──────────────────┘              └────────┬─────────┘
//!                                            │ UserStats
//!                                            ▼
//! ┌──────────────────┐  definitions ┌──────────────────┐
//! │AchievementCatalog│ ◀──────────▶ │UnlockCoordinator │
//! └──────────────────┘ unlock+points└──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let progress = ProgressManager::with_path(&db_path)?;
//! let coordinator = progress.coordinator(builtin_definitions());
//!
//! let outcome = coordinator.record_completion(record).await?;
//! for achievement in outcome.unlocked {
//!     println!("Unlocked {}", achievement.title);
//! }
//! ```

pub mod achievements;
mod aggregator;
mod db;
pub mod levels;
mod models;
mod recorder;
mod streaks;
mod time_bucket;

pub use aggregator::{aggregate, completed_lessons};
pub use db::ProgressDb;
pub use levels::{Level, LevelProgress, XpRewards};
pub use models::UserStats;
pub use recorder::SqliteActivityStore;
pub use streaks::StreakInfo;
pub use time_bucket::day_of;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use self::achievements::{
    AchievementDefinition, RewardRetry, SqliteAchievementLedger, UnlockCoordinator,
};

/// Central handle on the progress database
///
/// Hands out the activity store, the unlock ledger, and a coordinator wired
/// to both. Thread-safe through the internal mutex on the connection.
#[derive(Clone)]
pub struct ProgressManager {
    db: ProgressDb,
}

impl ProgressManager {
    /// Open (or create) the database at `path`
    pub fn with_path(path: &Path) -> Result<Self> {
        let db = ProgressDb::open(path)?;
        Ok(Self { db })
    }

    pub fn activity_store(&self) -> SqliteActivityStore {
        SqliteActivityStore::new(self.db.clone())
    }

    pub fn ledger(&self, definitions: Vec<AchievementDefinition>) -> SqliteAchievementLedger {
        SqliteAchievementLedger::new(self.db.clone(), definitions)
    }

    /// Coordinator over this database with the default reward retry policy
    pub fn coordinator(&self, definitions: Vec<AchievementDefinition>) -> UnlockCoordinator {
        self.coordinator_with_retry(definitions, RewardRetry::default())
    }

    pub fn coordinator_with_retry(
        &self,
        definitions: Vec<AchievementDefinition>,
        retry: RewardRetry,
    ) -> UnlockCoordinator {
        UnlockCoordinator::new(
            Arc::new(self.activity_store()),
            Arc::new(self.ledger(definitions)),
        )
        .with_retry(retry)
    }
}
