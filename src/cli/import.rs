//! Import command implementation

use std::path::Path;

use anyhow::{Context, Result, bail};

use lingua_progress::Lesson;

use super::App;

/// Load a JSON array of lessons into the catalog
pub fn import_lessons_command(app: &App, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read lesson file: {}", file.display()))?;
    let lessons: Vec<Lesson> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse lesson file: {}", file.display()))?;

    if let Some(bad) = lessons.iter().find(|l| l.id.trim().is_empty() || l.module_id.trim().is_empty()) {
        bail!("Lesson with empty id or module in {}: {:?}", file.display(), bad);
    }

    let count = app.progress.activity_store().import_lessons(&lessons)?;
    println!("Imported {} lesson(s) from {}", count, file.display());
    Ok(())
}
