use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A lesson as published in the content catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub module_id: String,
    /// Position within the module; lower comes first
    pub order: i64,
    /// False for "coming soon" placeholders that cannot be opened yet
    #[serde(default = "default_has_content")]
    pub has_content: bool,
    #[serde(default)]
    pub title: Option<String>,
}

fn default_has_content() -> bool {
    true
}

impl Lesson {
    pub fn new(id: impl Into<String>, module_id: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            module_id: module_id.into(),
            order,
            has_content: true,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn without_content(mut self) -> Self {
        self.has_content = false;
        self
    }

    /// Name shown to learners, falling back to the id
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// A learning module, derived by counting its lessons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub total_lessons: usize,
}

/// Read-only view of the lesson/module catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: Vec<Module>,
    lessons: Vec<Lesson>,
    lesson_module: HashMap<String, String>,
}

impl Catalog {
    /// Build a catalog from its lessons. Modules are derived from the lessons.
    pub fn from_lessons(lessons: Vec<Lesson>) -> Self {
        Self::new(Vec::new(), lessons)
    }

    /// Build a catalog from declared modules and lessons.
    ///
    /// Declared modules without lessons are kept with `total_lessons == 0`;
    /// every declared count is replaced by the number of lessons found.
    pub fn new(declared: Vec<Module>, lessons: Vec<Lesson>) -> Self {
        let mut counts: BTreeMap<String, usize> =
            declared.into_iter().map(|m| (m.id, 0)).collect();
        for lesson in &lessons {
            *counts.entry(lesson.module_id.clone()).or_insert(0) += 1;
        }

        let modules = counts
            .into_iter()
            .map(|(id, total_lessons)| Module { id, total_lessons })
            .collect();
        let lesson_module = lessons
            .iter()
            .map(|l| (l.id.clone(), l.module_id.clone()))
            .collect();

        Self {
            modules,
            lessons,
            lesson_module,
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Module a lesson belongs to, if the lesson is known
    pub fn module_of(&self, lesson_id: &str) -> Option<&str> {
        self.lesson_module.get(lesson_id).map(String::as_str)
    }

    /// Number of lessons in a module (0 for unknown modules)
    pub fn total_lessons(&self, module_id: &str) -> usize {
        self.modules
            .iter()
            .find(|m| m.id == module_id)
            .map(|m| m.total_lessons)
            .unwrap_or(0)
    }

    /// Lessons of one module, in catalog order (not sorted)
    pub fn module_lessons(&self, module_id: &str) -> Vec<Lesson> {
        self.lessons
            .iter()
            .filter(|l| l.module_id == module_id)
            .cloned()
            .collect()
    }
}
