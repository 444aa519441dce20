//! CLI command implementations

pub mod achievements;
pub mod check;
pub mod gate;
pub mod import;
pub mod init;
pub mod record;
pub mod stats;

use std::path::Path;

use anyhow::Result;

use lingua_progress::config::Config;
use lingua_progress::stats::ProgressManager;
use lingua_progress::stats::achievements::{AchievementDefinition, UnlockCoordinator};

/// Loaded config plus an open progress database
pub struct App {
    pub config: Config,
    pub progress: ProgressManager,
}

impl App {
    /// Load the config and open the database. `db` overrides `[storage] path`.
    pub fn open(config_path: Option<&Path>, db: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let db_path = db.map(Path::to_path_buf).unwrap_or_else(|| config.db_path());
        tracing::debug!("Using progress database {}", db_path.display());

        let progress = ProgressManager::with_path(&db_path)?;
        Ok(Self { config, progress })
    }

    pub fn definitions(&self) -> Result<Vec<AchievementDefinition>> {
        self.config.load_definitions()
    }

    pub fn coordinator(&self) -> Result<UnlockCoordinator> {
        Ok(self
            .progress
            .coordinator_with_retry(self.definitions()?, self.config.unlock.reward_retry()))
    }
}

/// One line per unlocked achievement
pub(crate) fn print_unlocked(unlocked: &[AchievementDefinition]) {
    for def in unlocked {
        println!("  Unlocked: {} (+{} points)", def.title, def.reward_points);
        if !def.description.is_empty() {
            println!("    {}", def.description);
        }
    }
}

/// Rewards that could not be applied yet
pub(crate) fn print_pending_rewards(pending: &[String]) {
    if pending.is_empty() {
        return;
    }
    println!("\nPoints pending for: {}", pending.join(", "));
    println!("They are applied on the next check.");
}
