//! Achievements: declarative definitions, requirement checks, and the
//! unlock coordinator that grants each one at most once per user.

mod checker;
mod definitions;
mod ledger;
mod manager;
mod requirement;

pub use checker::{Progress, evaluate, progress};
pub use definitions::{
    AchievementDefinition, LoadedCatalog, Rarity, RawDefinition, builtin_definitions,
    load_definitions, parse_catalog_json,
};
pub use ledger::SqliteAchievementLedger;
pub use manager::{
    AchievementProgress, CompletionOutcome, RewardRetry, UnlockCoordinator, UnlockReport,
};
pub use requirement::{RawRequirement, Requirement};
