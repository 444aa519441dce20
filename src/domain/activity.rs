use serde::{Deserialize, Serialize};

/// What kind of content a completion event refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// A lesson or exercise finished inside a module
    #[default]
    Lesson,
    /// An educational video watched to the end
    Video,
}

impl ActivityKind {
    /// Get the string used for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Video => "video",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lesson" => Some(Self::Lesson),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single completion event.
///
/// Records are immutable once written. Completing the same lesson again
/// produces a new record rather than mutating the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub user_id: String,
    /// Lesson id, or the video id for [`ActivityKind::Video`] records
    pub lesson_id: String,
    pub module_id: String,
    /// Exercise score as a percentage (0-100), if the lesson was scored
    #[serde(default)]
    pub score: Option<u32>,
    /// Completion time in milliseconds since the Unix epoch
    pub completed_at: i64,
    #[serde(default)]
    pub kind: ActivityKind,
}

impl ActivityRecord {
    /// Build a lesson completion record
    pub fn lesson(
        user_id: impl Into<String>,
        lesson_id: impl Into<String>,
        module_id: impl Into<String>,
        score: Option<u32>,
        completed_at: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            lesson_id: lesson_id.into(),
            module_id: module_id.into(),
            score,
            completed_at,
            kind: ActivityKind::Lesson,
        }
    }

    /// Build a "video watched" record
    pub fn video(
        user_id: impl Into<String>,
        video_id: impl Into<String>,
        module_id: impl Into<String>,
        completed_at: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            lesson_id: video_id.into(),
            module_id: module_id.into(),
            score: None,
            completed_at,
            kind: ActivityKind::Video,
        }
    }

    pub fn is_lesson(&self) -> bool {
        self.kind == ActivityKind::Lesson
    }
}
