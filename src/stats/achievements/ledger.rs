//! SQLite unlock ledger
//!
//! `user_achievements` has `(user_id, achievement_id)` as primary key, so
//! `INSERT OR IGNORE` is the conditional create. The reward flips the
//! record's `rewarded` flag and bumps the point total in one transaction.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;

use super::definitions::AchievementDefinition;
use crate::error::StorageError;
use crate::stats::db::ProgressDb;
use crate::store::{AchievementCatalog, PointsSummary, UnlockRecord};

/// Achievement catalog backed by the progress database
#[derive(Clone)]
pub struct SqliteAchievementLedger {
    db: ProgressDb,
    definitions: Vec<AchievementDefinition>,
}

impl SqliteAchievementLedger {
    pub fn new(db: ProgressDb, definitions: Vec<AchievementDefinition>) -> Self {
        Self { db, definitions }
    }

    /// All unlock records of a user, oldest first
    pub fn unlock_records(&self, user_id: &str) -> Result<Vec<UnlockRecord>, StorageError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT user_id, achievement_id, unlocked_at, rewarded FROM user_achievements
               WHERE user_id = ?1 ORDER BY unlocked_at, achievement_id"#,
        )?;
        let records = stmt
            .query_map(params![user_id], |row| {
                Ok(UnlockRecord {
                    user_id: row.get(0)?,
                    achievement_id: row.get(1)?,
                    unlocked_at: row.get(2)?,
                    rewarded: row.get::<_, i32>(3)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

#[async_trait]
impl AchievementCatalog for SqliteAchievementLedger {
    async fn definitions(&self) -> Result<Vec<AchievementDefinition>, StorageError> {
        Ok(self.definitions.clone())
    }

    async fn unlocked_ids(&self, user_id: &str) -> Result<HashSet<String>, StorageError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare("SELECT achievement_id FROM user_achievements WHERE user_id = ?1")?;
        let ids = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<HashSet<String>, _>>()?;
        Ok(ids)
    }

    async fn create_unlock_if_absent(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: i64,
    ) -> Result<bool, StorageError> {
        let conn = self.db.conn()?;
        let inserted = conn.execute(
            r#"INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, unlocked_at, rewarded)
               VALUES (?1, ?2, ?3, 0)"#,
            params![user_id, achievement_id, unlocked_at],
        )?;
        Ok(inserted == 1)
    }

    async fn add_points(
        &self,
        user_id: &str,
        achievement_id: &str,
        delta: u32,
    ) -> Result<bool, StorageError> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let claimed = tx.execute(
            r#"UPDATE user_achievements SET rewarded = 1
               WHERE user_id = ?1 AND achievement_id = ?2 AND rewarded = 0"#,
            params![user_id, achievement_id],
        )?;
        if claimed == 0 {
            return Ok(false);
        }

        tx.execute(
            r#"INSERT INTO user_points (user_id, total_points, achievements_unlocked, updated_at)
               VALUES (?1, ?2, 1, ?3)
               ON CONFLICT(user_id) DO UPDATE SET
                   total_points = total_points + ?2,
                   achievements_unlocked = achievements_unlocked + 1,
                   updated_at = ?3"#,
            params![user_id, delta, Utc::now().timestamp_millis()],
        )?;
        tx.commit()?;
        Ok(true)
    }

    async fn pending_rewards(&self, user_id: &str) -> Result<Vec<String>, StorageError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT achievement_id FROM user_achievements
               WHERE user_id = ?1 AND rewarded = 0 ORDER BY unlocked_at, achievement_id"#,
        )?;
        let ids = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    async fn points_summary(&self, user_id: &str) -> Result<PointsSummary, StorageError> {
        let conn = self.db.conn()?;
        let summary = conn.query_row(
            "SELECT total_points, achievements_unlocked FROM user_points WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(PointsSummary {
                    total_points: row.get::<_, i64>(0)?.max(0) as u64,
                    achievements_unlocked: row.get(1)?,
                })
            },
        );
        match summary {
            Ok(summary) => Ok(summary),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(PointsSummary::default()),
            Err(e) => Err(e.into()),
        }
    }
}
