//! Requirement predicates and their stored document form

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Condition over [`UserStats`](crate::stats::UserStats) that unlocks an achievement.
///
/// Every threshold is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Requirement {
    #[serde(rename = "lessons_completed")]
    LessonsCompletedAtLeast { count: u32 },

    #[serde(rename = "module_lessons", rename_all = "camelCase")]
    ModuleLessonsAtLeast { module_id: String, count: u32 },

    #[serde(rename = "module_completed", rename_all = "camelCase")]
    ModuleCompleted { module_id: String },

    #[serde(rename = "perfect_scores")]
    PerfectScoresAtLeast { count: u32 },

    #[serde(rename = "average_score")]
    AverageScoreAtLeast { score: u32 },

    #[serde(rename = "streak")]
    StreakAtLeast { days: u32 },

    #[serde(rename = "videos_watched")]
    VideosWatchedAtLeast { count: u32 },

    #[serde(rename = "all_modules")]
    AllModulesCompletedAtLeast { count: u32 },
}

impl Requirement {
    /// The stored `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LessonsCompletedAtLeast { .. } => "lessons_completed",
            Self::ModuleLessonsAtLeast { .. } => "module_lessons",
            Self::ModuleCompleted { .. } => "module_completed",
            Self::PerfectScoresAtLeast { .. } => "perfect_scores",
            Self::AverageScoreAtLeast { .. } => "average_score",
            Self::StreakAtLeast { .. } => "streak",
            Self::VideosWatchedAtLeast { .. } => "videos_watched",
            Self::AllModulesCompletedAtLeast { .. } => "all_modules",
        }
    }
}

/// Requirement as stored in catalog documents: a type tag plus optional fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequirement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub module_id: Option<String>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub days: Option<u32>,
}

impl RawRequirement {
    /// Convert into a typed requirement, naming `achievement_id` in errors
    pub fn validate(&self, achievement_id: &str) -> Result<Requirement, ValidationError> {
        let missing = |field: &'static str| ValidationError::MissingField {
            achievement_id: achievement_id.to_string(),
            kind: self.kind.clone(),
            field,
        };
        let count = || self.count.ok_or_else(|| missing("count"));
        let module_id = || {
            self.module_id
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .ok_or_else(|| missing("moduleId"))
        };

        let requirement = match self.kind.as_str() {
            "lessons_completed" => Requirement::LessonsCompletedAtLeast { count: count()? },
            "module_lessons" => Requirement::ModuleLessonsAtLeast {
                module_id: module_id()?,
                count: count()?,
            },
            "module_completed" => Requirement::ModuleCompleted {
                module_id: module_id()?,
            },
            "perfect_scores" => Requirement::PerfectScoresAtLeast { count: count()? },
            "average_score" => {
                let score = self.score.ok_or_else(|| missing("score"))?;
                if score > 100 {
                    return Err(ValidationError::InvalidValue {
                        achievement_id: achievement_id.to_string(),
                        message: format!("average score threshold {score} is above 100"),
                    });
                }
                Requirement::AverageScoreAtLeast { score }
            }
            "streak" => Requirement::StreakAtLeast {
                days: self.days.ok_or_else(|| missing("days"))?,
            },
            "videos_watched" => Requirement::VideosWatchedAtLeast { count: count()? },
            "all_modules" => Requirement::AllModulesCompletedAtLeast { count: count()? },
            other => {
                return Err(ValidationError::UnknownRequirement {
                    achievement_id: achievement_id.to_string(),
                    kind: other.to_string(),
                });
            }
        };
        Ok(requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawRequirement {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_requirements() {
        assert_eq!(
            raw(r#"{"type":"lessons_completed","count":5}"#).validate("a").unwrap(),
            Requirement::LessonsCompletedAtLeast { count: 5 }
        );
        assert_eq!(
            raw(r#"{"type":"module_lessons","moduleId":"vocabulary","count":100}"#)
                .validate("a")
                .unwrap(),
            Requirement::ModuleLessonsAtLeast {
                module_id: "vocabulary".to_string(),
                count: 100
            }
        );
        assert_eq!(
            raw(r#"{"type":"streak","days":7}"#).validate("a").unwrap(),
            Requirement::StreakAtLeast { days: 7 }
        );
        assert_eq!(
            raw(r#"{"type":"average_score","score":80}"#).validate("a").unwrap(),
            Requirement::AverageScoreAtLeast { score: 80 }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = raw(r#"{"type":"time_of_day","period":"night"}"#)
            .validate("night-owl")
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownRequirement {
                achievement_id: "night-owl".to_string(),
                kind: "time_of_day".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = raw(r#"{"type":"module_completed"}"#).validate("grammar-master").unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { field: "moduleId", .. }));

        let err = raw(r#"{"type":"module_completed","moduleId":"  "}"#)
            .validate("grammar-master")
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { field: "moduleId", .. }));

        let err = raw(r#"{"type":"streak","count":3}"#).validate("s").unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { field: "days", .. }));
    }

    #[test]
    fn test_average_above_100_rejected() {
        let err = raw(r#"{"type":"average_score","score":120}"#).validate("x").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_serializes_with_stored_tags() {
        let req = Requirement::ModuleCompleted {
            module_id: "grammar".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "module_completed");
        assert_eq!(json["moduleId"], "grammar");
        assert_eq!(req.kind(), "module_completed");
    }
}
