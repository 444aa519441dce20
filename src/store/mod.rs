//! Collaborator interfaces for the progress engine
//!
//! The engine never talks to a database directly. It reads activity and the
//! lesson catalog through [`ActivityStore`], and reads definitions / writes
//! the unlock ledger through [`AchievementCatalog`]. Both are implemented by
//! the SQLite backend in [`crate::stats`] and by [`MemoryStore`].

mod memory;

pub use memory::MemoryStore;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityRecord, Catalog};
use crate::error::StorageError;
use crate::stats::achievements::AchievementDefinition;

/// Proof that an achievement was granted to a user.
///
/// At most one record exists per `(user_id, achievement_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRecord {
    pub user_id: String,
    pub achievement_id: String,
    pub unlocked_at: i64,
    /// Whether the reward points for this record have been applied
    pub rewarded: bool,
}

/// A user's point total and achievement counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsSummary {
    pub total_points: u64,
    pub achievements_unlocked: u32,
}

/// Durable record of completion events plus the lesson catalog
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// All completion events of a user, in no particular order
    async fn activity_records(&self, user_id: &str) -> Result<Vec<ActivityRecord>, StorageError>;

    /// The lesson/module catalog
    async fn catalog(&self) -> Result<Catalog, StorageError>;

    /// Append a completion event
    async fn record_completion(&self, record: ActivityRecord) -> Result<(), StorageError>;
}

/// Achievement definitions plus the per-user unlock ledger
#[async_trait]
pub trait AchievementCatalog: Send + Sync {
    /// All valid achievement definitions
    async fn definitions(&self) -> Result<Vec<AchievementDefinition>, StorageError>;

    /// Ids of achievements the user already has an unlock record for
    async fn unlocked_ids(&self, user_id: &str) -> Result<HashSet<String>, StorageError>;

    /// Create the unlock record if it does not exist yet.
    ///
    /// Returns `false` when another caller created it first.
    async fn create_unlock_if_absent(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: i64,
    ) -> Result<bool, StorageError>;

    /// Apply the reward owed for an existing unlock record.
    ///
    /// Adds `delta` to the user's points and increments the achievement
    /// counter in one atomic step, then marks the record rewarded. Returns
    /// `false` if the record is missing or was already rewarded.
    async fn add_points(
        &self,
        user_id: &str,
        achievement_id: &str,
        delta: u32,
    ) -> Result<bool, StorageError>;

    /// Unlock records whose reward has not been applied yet
    async fn pending_rewards(&self, user_id: &str) -> Result<Vec<String>, StorageError>;

    async fn points_summary(&self, user_id: &str) -> Result<PointsSummary, StorageError>;
}

/// Reject records that could never have come from a finished lesson
pub(crate) fn validate_record(record: &ActivityRecord) -> Result<(), StorageError> {
    if record.user_id.trim().is_empty() {
        return Err(StorageError::InvalidRecord("empty user id".to_string()));
    }
    if record.lesson_id.trim().is_empty() {
        return Err(StorageError::InvalidRecord("empty lesson id".to_string()));
    }
    if let Some(score) = record.score {
        if score > 100 {
            return Err(StorageError::InvalidRecord(format!(
                "score {} for lesson {} is above 100",
                score, record.lesson_id
            )));
        }
    }
    Ok(())
}
