//! Sequential lesson gating
//!
//! Each lesson in a module is Locked, Unlocked or Completed. The first lesson
//! starts Unlocked; every other lesson unlocks once the lesson right before
//! it is completed. Completed is terminal.
//!
//! Gating needs a deterministic order. Sort with [`sort_lessons`] (by
//! `(order, id)`) before calling [`status`].

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{Catalog, Lesson};

/// Per-lesson state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonState {
    Locked,
    Unlocked,
    Completed,
}

impl std::fmt::Display for LessonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// What a module page needs to render one lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStatus {
    pub is_completed: bool,
    pub is_locked: bool,
    /// Unlocked and has content to open
    pub can_start: bool,
    /// Why the lesson is locked, naming the lesson to finish first
    pub lock_reason: Option<String>,
}

impl LessonStatus {
    /// Collapse into the state machine view. A completed lesson stays
    /// completed (reviewable) even if its predecessor is not.
    pub fn state(&self) -> LessonState {
        if self.is_completed {
            LessonState::Completed
        } else if self.is_locked {
            LessonState::Locked
        } else {
            LessonState::Unlocked
        }
    }
}

/// Sort lessons by `(order, id)`, the total order gating relies on
pub fn sort_lessons(lessons: &mut [Lesson]) {
    lessons.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}

/// Gate status of `lessons[index]`.
///
/// `lessons` must be sorted with [`sort_lessons`] and belong to one module.
/// Returns `None` when `index` is out of range.
pub fn status(lessons: &[Lesson], index: usize, completed: &HashSet<String>) -> Option<LessonStatus> {
    let lesson = lessons.get(index)?;

    let blocker = match index {
        0 => None,
        _ => lessons
            .get(index - 1)
            .filter(|prev| !completed.contains(&prev.id)),
    };
    let is_locked = blocker.is_some();

    Some(LessonStatus {
        is_completed: completed.contains(&lesson.id),
        is_locked,
        can_start: !is_locked && lesson.has_content,
        lock_reason: blocker.map(|prev| format!("Complete \"{}\" to unlock this lesson", prev.display_name())),
    })
}

/// Sorted lessons of one module paired with their status
pub fn module_gate(
    catalog: &Catalog,
    module_id: &str,
    completed: &HashSet<String>,
) -> Vec<(Lesson, LessonStatus)> {
    let mut lessons = catalog.module_lessons(module_id);
    sort_lessons(&mut lessons);

    (0..lessons.len())
        .filter_map(|i| status(&lessons, i, completed).map(|s| (lessons[i].clone(), s)))
        .collect()
}
