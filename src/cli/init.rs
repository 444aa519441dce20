//! Init command implementation

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

use lingua_progress::config::Config;

/// Default configuration content for lingua-progress init
pub const DEFAULT_CONFIG: &str = r#"# Lingua Progress configuration

[storage]
# Progress database. Defaults to ~/.lingua-progress/progress.db
# path = "/var/lib/lingua/progress.db"

[achievements]
# JSON array of achievement definitions. The built-in catalog is used when unset.
# catalog = "achievements.json"

[unlock]
# Attempts to apply a reward once its unlock record exists
reward_retry_attempts = 3
# Delay before the second attempt; grows linearly
reward_retry_backoff_ms = 50
"#;

/// Write the default config to `path`, or to the global config path
pub fn init_command(path: Option<&Path>, force: bool) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::global_config_path);

    if target.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            target.display()
        );
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    std::fs::write(&target, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", target.display()))?;

    info!("Created config file: {}", target.display());
    println!("Created {}", target.display());
    Ok(())
}
