//! SQLite database connection and schema management for progress data
//!
//! Manages the `~/.lingua-progress/progress.db` database and its schema.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::error::StorageError;

/// Shared database handle
#[derive(Clone)]
pub struct ProgressDb {
    conn: Arc<Mutex<Connection>>,
}

impl ProgressDb {
    /// Open or create the progress database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open progress db: {}", path.display()))?;

        // WAL lets the CLI read while the host app writes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the connection
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }
}

/// SQL schema for the progress database
const SCHEMA_SQL: &str = r#"
-- Completion events (append-only)
CREATE TABLE IF NOT EXISTS activity (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    lesson_id TEXT NOT NULL,
    module_id TEXT NOT NULL,
    kind TEXT NOT NULL DEFAULT 'lesson',
    score INTEGER,
    completed_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_activity_user ON activity(user_id);

-- Lesson catalog
CREATE TABLE IF NOT EXISTS lessons (
    id TEXT PRIMARY KEY,
    module_id TEXT NOT NULL,
    lesson_order INTEGER NOT NULL,
    has_content INTEGER NOT NULL DEFAULT 1,
    title TEXT
);
CREATE INDEX IF NOT EXISTS idx_lessons_module ON lessons(module_id, lesson_order);

-- Declared modules (may have no published lessons yet)
CREATE TABLE IF NOT EXISTS modules (
    id TEXT PRIMARY KEY
);

-- Unlock ledger, one row per (user, achievement)
CREATE TABLE IF NOT EXISTS user_achievements (
    user_id TEXT NOT NULL,
    achievement_id TEXT NOT NULL,
    unlocked_at INTEGER NOT NULL,
    rewarded INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, achievement_id)
);
CREATE INDEX IF NOT EXISTS idx_unlock_pending ON user_achievements(user_id, rewarded);

-- Point totals
CREATE TABLE IF NOT EXISTS user_points (
    user_id TEXT PRIMARY KEY,
    total_points INTEGER NOT NULL DEFAULT 0,
    achievements_unlocked INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db = ProgressDb::open(&dir.path().join("progress.db")).unwrap();

        let conn = db.conn().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"activity".to_string()));
        assert!(tables.contains(&"lessons".to_string()));
        assert!(tables.contains(&"user_achievements".to_string()));
        assert!(tables.contains(&"user_points".to_string()));

        let version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.db");
        drop(ProgressDb::open(&path).unwrap());
        let db = ProgressDb::open(&path).unwrap();

        let conn = db.conn().unwrap();
        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_new_unlock_starts_unrewarded() {
        let dir = tempdir().unwrap();
        let db = ProgressDb::open(&dir.path().join("progress.db")).unwrap();

        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO user_achievements (user_id, achievement_id, unlocked_at) VALUES ('u1', 'first-lesson', 10)",
            [],
        )
        .unwrap();
        let rewarded: i32 = conn
            .query_row(
                "SELECT rewarded FROM user_achievements WHERE user_id = 'u1' AND achievement_id = 'first-lesson'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(rewarded, 0);
    }
}
