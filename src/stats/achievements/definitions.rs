//! Achievement definitions and catalog loading
//!
//! Definitions are static per deployment. They are loaded from JSON
//! documents where each entry looks like
//!
//! ```json
//! { "id": "first-lesson", "title": "First Steps", "points": 60,
//!   "rarity": "common", "requirement": { "type": "lessons_completed", "count": 1 } }
//! ```
//!
//! Malformed entries are rejected here, once, instead of at evaluation time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::requirement::{RawRequirement, Requirement};
use crate::error::ValidationError;

/// Built-in catalog shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("../../../data/achievements.json");

/// How rare an achievement is, for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "common" => Some(Self::Common),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// A validated achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub rarity: Rarity,
    #[serde(rename = "points")]
    pub reward_points: u32,
    pub requirement: Requirement,
}

impl AchievementDefinition {
    pub fn new(id: impl Into<String>, requirement: Requirement, reward_points: u32) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            description: String::new(),
            category: String::new(),
            rarity: Rarity::Common,
            reward_points,
            requirement,
        }
    }
}

/// An achievement entry as stored, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDefinition {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(alias = "rewardPoints")]
    pub points: u32,
    pub requirement: RawRequirement,
}

impl RawDefinition {
    pub fn validate(self) -> Result<AchievementDefinition, ValidationError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::InvalidValue {
                achievement_id: "<empty>".to_string(),
                message: "achievement id is empty".to_string(),
            });
        }

        let requirement = self.requirement.validate(&id)?;
        let rarity = match self.rarity.as_deref() {
            None => Rarity::default(),
            Some(r) => Rarity::parse(r).ok_or_else(|| ValidationError::InvalidValue {
                achievement_id: id.clone(),
                message: format!("unknown rarity '{r}'"),
            })?,
        };

        Ok(AchievementDefinition {
            title: self.title.unwrap_or_else(|| id.clone()),
            id,
            description: self.description,
            category: self.category,
            rarity,
            reward_points: self.points,
            requirement,
        })
    }
}

/// Result of loading a catalog: valid definitions plus everything rejected
#[derive(Debug, Clone, Default)]
pub struct LoadedCatalog {
    pub definitions: Vec<AchievementDefinition>,
    pub rejected: Vec<ValidationError>,
}

/// Validate raw entries, skipping (and logging) malformed ones.
///
/// When an id appears more than once the first entry wins.
pub fn load_definitions(raw: Vec<RawDefinition>) -> LoadedCatalog {
    let mut loaded = LoadedCatalog::default();
    let mut seen = HashSet::new();

    for entry in raw {
        match entry.validate() {
            Ok(def) if !seen.insert(def.id.clone()) => {
                reject(&mut loaded, ValidationError::DuplicateId(def.id));
            }
            Ok(def) => loaded.definitions.push(def),
            Err(e) => reject(&mut loaded, e),
        }
    }

    tracing::debug!(
        valid = loaded.definitions.len(),
        rejected = loaded.rejected.len(),
        "Loaded achievement catalog"
    );
    loaded
}

/// Parse a JSON array of achievement entries.
///
/// Only a document that is not a JSON array fails as a whole; entries that
/// do not have the expected shape are rejected individually.
pub fn parse_catalog_json(json: &str) -> Result<LoadedCatalog, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut raw = Vec::with_capacity(values.len());
    let mut shape_errors = Vec::new();

    for value in values {
        let id = value
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>")
            .to_string();
        match serde_json::from_value::<RawDefinition>(value) {
            Ok(entry) => raw.push(entry),
            Err(e) => shape_errors.push(ValidationError::InvalidValue {
                achievement_id: id,
                message: e.to_string(),
            }),
        }
    }

    let mut loaded = LoadedCatalog::default();
    for e in shape_errors {
        reject(&mut loaded, e);
    }
    let validated = load_definitions(raw);
    loaded.definitions = validated.definitions;
    loaded.rejected.extend(validated.rejected);
    Ok(loaded)
}

/// The catalog bundled with the crate
pub fn builtin_definitions() -> Vec<AchievementDefinition> {
    match parse_catalog_json(BUILTIN_CATALOG) {
        Ok(loaded) => loaded.definitions,
        Err(e) => {
            tracing::error!("Built-in achievement catalog is not valid JSON: {}", e);
            Vec::new()
        }
    }
}

fn reject(loaded: &mut LoadedCatalog, error: ValidationError) {
    tracing::warn!("Skipping achievement: {}", error);
    loaded.rejected.push(error);
}
