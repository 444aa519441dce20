//! SQLite activity store - writes completion events and serves the catalog

use async_trait::async_trait;
use rusqlite::{Connection, params};

use super::db::ProgressDb;
use crate::domain::{ActivityKind, ActivityRecord, Catalog, Lesson, Module};
use crate::error::StorageError;
use crate::store::{ActivityStore, validate_record};

/// Activity store backed by the progress database
#[derive(Clone)]
pub struct SqliteActivityStore {
    db: ProgressDb,
}

impl SqliteActivityStore {
    pub fn new(db: ProgressDb) -> Self {
        Self { db }
    }

    /// Insert or replace catalog lessons. Returns the number written.
    pub fn import_lessons(&self, lessons: &[Lesson]) -> Result<usize, StorageError> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;
        for lesson in lessons {
            tx.execute(
                r#"INSERT INTO lessons (id, module_id, lesson_order, has_content, title)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   ON CONFLICT(id) DO UPDATE SET
                       module_id = ?2, lesson_order = ?3, has_content = ?4, title = ?5"#,
                params![
                    lesson.id,
                    lesson.module_id,
                    lesson.order,
                    lesson.has_content as i32,
                    lesson.title,
                ],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO modules (id) VALUES (?1)",
                params![lesson.module_id],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = lessons.len(), "Imported lessons");
        Ok(lessons.len())
    }

    /// Declare a module that may not have lessons yet
    pub fn declare_module(&self, module_id: &str) -> Result<(), StorageError> {
        let conn = self.db.conn()?;
        conn.execute("INSERT OR IGNORE INTO modules (id) VALUES (?1)", params![module_id])?;
        Ok(())
    }

    fn load_catalog(conn: &Connection) -> Result<Catalog, StorageError> {
        let mut stmt = conn.prepare(
            "SELECT id, module_id, lesson_order, has_content, title FROM lessons ORDER BY module_id, lesson_order, id",
        )?;
        let lessons = stmt
            .query_map([], |row| {
                Ok(Lesson {
                    id: row.get(0)?,
                    module_id: row.get(1)?,
                    order: row.get(2)?,
                    has_content: row.get::<_, i32>(3)? != 0,
                    title: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare("SELECT id FROM modules ORDER BY id")?;
        let modules = stmt
            .query_map([], |row| {
                Ok(Module {
                    id: row.get(0)?,
                    total_lessons: 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog::new(modules, lessons))
    }
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    async fn activity_records(&self, user_id: &str) -> Result<Vec<ActivityRecord>, StorageError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, lesson_id, module_id, score, completed_at, kind FROM activity WHERE user_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                let kind: String = row.get(5)?;
                let Some(kind) = ActivityKind::parse(&kind) else {
                    let lesson_id: String = row.get(1)?;
                    tracing::warn!(user_id, lesson_id = %lesson_id, kind = %kind, "Skipping activity with unknown kind");
                    return Ok(None);
                };
                Ok(Some(ActivityRecord {
                    user_id: row.get(0)?,
                    lesson_id: row.get(1)?,
                    module_id: row.get(2)?,
                    score: row.get(3)?,
                    completed_at: row.get(4)?,
                    kind,
                }))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().flatten().collect())
    }

    async fn catalog(&self) -> Result<Catalog, StorageError> {
        let conn = self.db.conn()?;
        Self::load_catalog(&conn)
    }

    async fn record_completion(&self, record: ActivityRecord) -> Result<(), StorageError> {
        validate_record(&record)?;
        let conn = self.db.conn()?;
        conn.execute(
            r#"INSERT INTO activity (user_id, lesson_id, module_id, kind, score, completed_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                record.user_id,
                record.lesson_id,
                record.module_id,
                record.kind.as_str(),
                record.score,
                record.completed_at,
            ],
        )?;
        tracing::debug!(
            user_id = %record.user_id,
            lesson_id = %record.lesson_id,
            kind = %record.kind,
            "Recorded completion"
        );
        Ok(())
    }
}
