//! Configuration loading and management

mod io;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stats::achievements::RewardRetry;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the progress database lives
    #[serde(default)]
    pub storage: StorageSettings,

    /// Which achievement catalog to use
    #[serde(default)]
    pub achievements: AchievementSettings,

    /// Reward retry policy for the unlock coordinator
    #[serde(default)]
    pub unlock: UnlockSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. Defaults to `~/.lingua-progress/progress.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementSettings {
    /// JSON catalog file. The built-in catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockSettings {
    #[serde(default = "default_reward_retry_attempts")]
    pub reward_retry_attempts: u32,

    #[serde(default = "default_reward_retry_backoff_ms")]
    pub reward_retry_backoff_ms: u64,
}

fn default_reward_retry_attempts() -> u32 {
    3
}

fn default_reward_retry_backoff_ms() -> u64 {
    50
}

impl Default for UnlockSettings {
    fn default() -> Self {
        Self {
            reward_retry_attempts: default_reward_retry_attempts(),
            reward_retry_backoff_ms: default_reward_retry_backoff_ms(),
        }
    }
}

impl UnlockSettings {
    pub fn reward_retry(&self) -> RewardRetry {
        RewardRetry {
            attempts: self.reward_retry_attempts.max(1),
            backoff: Duration::from_millis(self.reward_retry_backoff_ms),
        }
    }
}
