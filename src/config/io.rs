//! Configuration file I/O operations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;
use crate::stats::achievements::{AchievementDefinition, builtin_definitions, parse_catalog_json};

impl Config {
    /// Get the global config directory path (~/.lingua-progress/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lingua-progress")
    }

    /// Get the global config file path (~/.lingua-progress/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path`, or from the global config file.
    ///
    /// An explicit path must exist. A missing global file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let global = Self::global_config_path();
        if global.exists() {
            Self::from_file(&global)
        } else {
            tracing::debug!("No config file at {}, using defaults", global.display());
            Ok(Self::default())
        }
    }

    /// Database path from `[storage] path`, or the default location
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("progress.db"))
    }

    /// Achievement definitions from the configured catalog file, or the
    /// built-in catalog. Malformed entries are skipped and logged.
    pub fn load_definitions(&self) -> Result<Vec<AchievementDefinition>> {
        let Some(path) = &self.achievements.catalog else {
            return Ok(builtin_definitions());
        };

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read achievement catalog: {}", path.display()))?;
        let loaded = parse_catalog_json(&json)
            .with_context(|| format!("Achievement catalog is not a JSON array: {}", path.display()))?;

        if !loaded.rejected.is_empty() {
            tracing::warn!(
                rejected = loaded.rejected.len(),
                "Some achievements in {} were skipped",
                path.display()
            );
        }
        Ok(loaded.definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let db = dir.path().join("p.db");
        std::fs::write(
            &path,
            format!(
                "[storage]\npath = {:?}\n\n[unlock]\nreward_retry_attempts = 5\n",
                db.display().to_string()
            ),
        )
        .unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.unlock.reward_retry_attempts, 5);
        assert_eq!(loaded.db_path(), db);
        assert_eq!(loaded.achievements, Config::default().achievements);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_default_db_path() {
        let config = Config::default();
        assert!(config.db_path().ends_with(".lingua-progress/progress.db"));
    }

    #[test]
    fn test_catalog_file_skips_bad_entries() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("achievements.json");
        std::fs::write(
            &catalog,
            r#"[
                {"id": "first", "points": 10, "requirement": {"type": "lessons_completed", "count": 1}},
                {"id": "broken", "points": 10, "requirement": {"type": "time_of_day"}}
            ]"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.achievements.catalog = Some(catalog);
        let definitions = config.load_definitions().unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].id, "first");
    }

    #[test]
    fn test_builtin_catalog_when_unset() {
        let definitions = Config::default().load_definitions().unwrap();
        assert_eq!(definitions.len(), builtin_definitions().len());
        assert!(!definitions.is_empty());
    }
}
