//! XP and level system
//!
//! XP is derived from completed lessons, never stored, so a level can always
//! be recomputed from activity.

/// Level definition
#[derive(Debug, Clone)]
pub struct Level {
    pub level: u32,
    pub xp_required: u32,
    pub title: &'static str,
}

/// All level definitions (must be sorted by level)
pub static LEVELS: &[Level] = &[
    Level {
        level: 1,
        xp_required: 0,
        title: "Newcomer",
    },
    Level {
        level: 2,
        xp_required: 100,
        title: "Starter",
    },
    Level {
        level: 3,
        xp_required: 250,
        title: "Starter",
    },
    Level {
        level: 4,
        xp_required: 500,
        title: "Learner",
    },
    Level {
        level: 5,
        xp_required: 800,
        title: "Learner",
    },
    Level {
        level: 6,
        xp_required: 1200,
        title: "Conversationalist",
    },
    Level {
        level: 7,
        xp_required: 1700,
        title: "Conversationalist",
    },
    Level {
        level: 8,
        xp_required: 2300,
        title: "Storyteller",
    },
    Level {
        level: 9,
        xp_required: 3000,
        title: "Storyteller",
    },
    Level {
        level: 10,
        xp_required: 4000,
        title: "Wordsmith",
    },
    Level {
        level: 11,
        xp_required: 5500,
        title: "Wordsmith",
    },
    Level {
        level: 12,
        xp_required: 7500,
        title: "Polyglot",
    },
];

impl Level {
    /// Level reached with `xp`
    pub fn for_xp(xp: u32) -> &'static Level {
        LEVELS
            .iter()
            .rev()
            .find(|l| xp >= l.xp_required)
            .unwrap_or(&LEVELS[0])
    }

    /// XP needed for the level after `current_level` (None if max level)
    pub fn xp_for_next(current_level: u32) -> Option<u32> {
        LEVELS
            .iter()
            .find(|l| l.level == current_level + 1)
            .map(|l| l.xp_required)
    }

    pub fn max_level() -> u32 {
        LEVELS.last().map(|l| l.level).unwrap_or(1)
    }
}

/// Where a user stands between two levels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelProgress {
    pub xp: u32,
    pub level: u32,
    pub title: String,
    /// XP at which the current level starts
    pub current_level_xp: u32,
    /// XP needed for next level (None if max)
    pub next_level_xp: Option<u32>,
}

impl LevelProgress {
    pub fn new(xp: u32) -> Self {
        let level = Level::for_xp(xp);
        Self {
            xp,
            level: level.level,
            title: level.title.to_string(),
            current_level_xp: level.xp_required,
            next_level_xp: Level::xp_for_next(level.level),
        }
    }

    /// Progress to the next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        match self.next_level_xp {
            Some(next) => {
                let xp_in_level = self.xp - self.current_level_xp;
                let xp_for_level = next - self.current_level_xp;
                if xp_for_level == 0 {
                    1.0
                } else {
                    xp_in_level as f32 / xp_for_level as f32
                }
            }
            None => 1.0,
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next_level_xp.is_none()
    }
}

/// XP rewards per completed lesson
pub struct XpRewards;

impl XpRewards {
    /// XP for completing a lesson, scored or not
    pub const LESSON_BASE: u32 = 50;

    /// Bonus for a scored lesson: a tenth of the score, rounded half up (0-10)
    pub fn score_bonus(score: Option<u32>) -> u32 {
        score.map(|s| (s.min(100) + 5) / 10).unwrap_or(0)
    }

    pub fn lesson(score: Option<u32>) -> u32 {
        Self::LESSON_BASE + Self::score_bonus(score)
    }
}
