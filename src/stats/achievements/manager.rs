//! Unlock coordinator - core achievement logic
//!
//! Aggregates a user's activity, evaluates every definition the user does not
//! have yet, and issues rewards at most once per `(user, achievement)`.
//!
//! The unlock record is the uniqueness proof. It is created with a
//! conditional write, and the reward is applied separately, keyed by that
//! record, so either step can be retried without paying twice.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::checker::{Progress, evaluate, progress};
use super::definitions::AchievementDefinition;
use crate::domain::ActivityRecord;
use crate::error::{EngineError, StorageError};
use crate::stats::aggregator::aggregate;
use crate::stats::models::UserStats;
use crate::store::{AchievementCatalog, ActivityStore, PointsSummary};

/// How often to retry applying a reward after its unlock record exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRetry {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Delay before the second attempt; grows linearly
    pub backoff: Duration,
}

impl Default for RewardRetry {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

/// Result of one achievement check
#[derive(Debug, Clone, Default)]
pub struct UnlockReport {
    /// Achievements unlocked by this check, whether or not their points landed
    pub unlocked: Vec<AchievementDefinition>,
    /// Achievements whose points are still owed; the next check settles them
    pub rewards_pending: Vec<String>,
}

/// Outcome of recording a completion
#[derive(Debug, Clone, Default)]
pub struct CompletionOutcome {
    /// Achievements unlocked by this completion
    pub unlocked: Vec<AchievementDefinition>,
    /// Unlocked achievements whose points are not applied yet
    pub rewards_pending: Vec<String>,
    /// The check failed; the completion is saved and the check can be rerun
    pub achievements_pending: bool,
}

/// One row of an achievements page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub definition: AchievementDefinition,
    pub unlocked: bool,
    pub progress: Progress,
}

/// Orchestrates aggregation, evaluation and idempotent reward issuance
#[derive(Clone)]
pub struct UnlockCoordinator {
    activity: Arc<dyn ActivityStore>,
    achievements: Arc<dyn AchievementCatalog>,
    retry: RewardRetry,
}

impl UnlockCoordinator {
    pub fn new(activity: Arc<dyn ActivityStore>, achievements: Arc<dyn AchievementCatalog>) -> Self {
        Self {
            activity,
            achievements,
            retry: RewardRetry::default(),
        }
    }

    pub fn with_retry(mut self, retry: RewardRetry) -> Self {
        self.retry = retry;
        self
    }

    /// Recompute a user's stats from their full activity
    pub async fn user_stats(&self, user_id: &str, now: DateTime<Utc>) -> Result<UserStats, EngineError> {
        let records = self.activity.activity_records(user_id).await?;
        let catalog = self.activity.catalog().await?;
        Ok(aggregate(&records, &catalog, now.date_naive()))
    }

    /// Check all achievements for a user and unlock the ones now satisfied.
    ///
    /// Returns the achievements unlocked by this call. Calling it again
    /// without new activity returns an empty report.
    pub async fn check_and_unlock(&self, user_id: &str) -> Result<UnlockReport, EngineError> {
        self.check_and_unlock_at(user_id, Utc::now()).await
    }

    /// [`check_and_unlock`](Self::check_and_unlock) with an explicit clock.
    ///
    /// Only read failures and failed unlock creates are errors. Once an unlock
    /// record exists the achievement is reported, and a reward that still
    /// fails after retrying is left pending for the next check.
    pub async fn check_and_unlock_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UnlockReport, EngineError> {
        tracing::debug!(user_id, "Checking achievements");

        // All reads happen before any write, so a read failure leaves nothing behind
        let definitions = self.achievements.definitions().await?;
        let unlocked = self.achievements.unlocked_ids(user_id).await?;
        let pending = self.achievements.pending_rewards(user_id).await?;
        let stats = self.user_stats(user_id, now).await?;
        tracing::debug!(user_id, ?stats, "Aggregated user stats");

        let by_id: HashMap<&str, &AchievementDefinition> =
            definitions.iter().map(|d| (d.id.as_str(), d)).collect();
        let mut report = UnlockReport::default();

        // Rewards owed by an earlier check whose reward step failed
        for achievement_id in &pending {
            let points = match by_id.get(achievement_id.as_str()) {
                Some(def) => def.reward_points,
                None => {
                    tracing::warn!(
                        user_id,
                        achievement_id = %achievement_id,
                        "Pending reward for achievement no longer in catalog, settling with 0 points"
                    );
                    0
                }
            };
            if !self.settle_reward(user_id, achievement_id, points).await {
                report.rewards_pending.push(achievement_id.clone());
            }
        }

        let unlocked_at = now.timestamp_millis();

        for def in &definitions {
            if unlocked.contains(&def.id) || !evaluate(&def.requirement, &stats) {
                continue;
            }

            let created = self
                .achievements
                .create_unlock_if_absent(user_id, &def.id, unlocked_at)
                .await?;
            if !created {
                tracing::debug!(user_id, achievement_id = %def.id, "Already unlocked by a concurrent check");
                continue;
            }

            tracing::info!(
                user_id,
                achievement_id = %def.id,
                points = def.reward_points,
                "Achievement unlocked"
            );
            if !self.settle_reward(user_id, &def.id, def.reward_points).await {
                report.rewards_pending.push(def.id.clone());
            }
            report.unlocked.push(def.clone());
        }

        tracing::debug!(
            user_id,
            count = report.unlocked.len(),
            pending = report.rewards_pending.len(),
            "Achievement check finished"
        );
        Ok(report)
    }

    /// Apply a reward, leaving it pending when every attempt fails
    async fn settle_reward(&self, user_id: &str, achievement_id: &str, points: u32) -> bool {
        match self.apply_reward(user_id, achievement_id, points).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    achievement_id,
                    "Reward not applied, left pending for the next check: {}",
                    e
                );
                false
            }
        }
    }

    /// Apply the reward for an existing unlock record, retrying only this step
    async fn apply_reward(&self, user_id: &str, achievement_id: &str, points: u32) -> Result<(), StorageError> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.achievements.add_points(user_id, achievement_id, points).await {
                Ok(applied) => {
                    if !applied {
                        tracing::debug!(user_id, achievement_id, "Reward already applied");
                    }
                    return Ok(());
                }
                Err(e) if attempt < attempts && e.is_retryable() => {
                    tracing::warn!(
                        user_id,
                        achievement_id,
                        attempt,
                        "Applying reward failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Save a completion and run the achievement check.
    ///
    /// Only a failure to save the completion is returned as an error. If the
    /// check fails afterwards the completion is kept and the outcome is
    /// flagged so the caller can rerun the check later.
    pub async fn record_completion(&self, record: ActivityRecord) -> Result<CompletionOutcome, StorageError> {
        let user_id = record.user_id.clone();
        self.activity.record_completion(record).await?;

        match self.check_and_unlock(&user_id).await {
            Ok(report) => Ok(CompletionOutcome {
                unlocked: report.unlocked,
                rewards_pending: report.rewards_pending,
                achievements_pending: false,
            }),
            Err(e) => {
                tracing::warn!(user_id = %user_id, "Progress saved, achievement check pending: {}", e);
                Ok(CompletionOutcome {
                    achievements_pending: true,
                    ..CompletionOutcome::default()
                })
            }
        }
    }

    /// Point total and achievement counter of a user
    pub async fn summary(&self, user_id: &str) -> Result<PointsSummary, EngineError> {
        Ok(self.achievements.points_summary(user_id).await?)
    }

    /// Every definition with its unlock state and progress, in catalog order
    pub async fn progress_report(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<AchievementProgress>, EngineError> {
        let definitions = self.achievements.definitions().await?;
        let unlocked = self.achievements.unlocked_ids(user_id).await?;
        let stats = self.user_stats(user_id, now).await?;

        Ok(definitions
            .into_iter()
            .map(|definition| AchievementProgress {
                unlocked: unlocked.contains(&definition.id),
                progress: progress(&definition.requirement, &stats),
                definition,
            })
            .collect())
    }
}
