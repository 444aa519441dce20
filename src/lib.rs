//! Lingua Progress - progress tracking for a language-learning app
//!
//! Records lesson and video completions, derives per-user statistics from
//! them, unlocks achievements at most once per user, and decides which
//! lessons of a module a learner may open.
//!
//! ## Building blocks
//!
//! 1. **Aggregation**: [`stats::aggregate`] folds raw completion events into
//!    [`stats::UserStats`]. Repeated completions of a lesson count once.
//!
//! 2. **Achievements**: [`stats::achievements::UnlockCoordinator`] checks the
//!    catalog against those stats. The unlock record is written with a
//!    conditional create and the reward is keyed by that record, so
//!    concurrent or repeated checks never pay twice.
//!
//! 3. **Gating**: [`gate`] turns a module's lessons and the learner's
//!    completions into Locked / Unlocked / Completed states.
//!
//! Storage sits behind the [`store::ActivityStore`] and
//! [`store::AchievementCatalog`] traits, with an in-memory implementation in
//! [`store::MemoryStore`] and SQLite implementations in [`stats`].

pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod stats;
pub mod store;

pub use domain::*;
pub use error::{EngineError, StorageError, ValidationError};
