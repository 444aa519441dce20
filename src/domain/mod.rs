//! Core domain types: completion events and the lesson catalog

mod activity;
mod catalog;

pub use activity::{ActivityKind, ActivityRecord};
pub use catalog::{Catalog, Lesson, Module};
