//! Gate command implementation

use anyhow::Result;

use lingua_progress::gate::{LessonState, module_gate};
use lingua_progress::stats::completed_lessons;
use lingua_progress::store::ActivityStore;

use super::App;

/// Show which lessons of a module the user can open
pub async fn gate_command(app: &App, user: &str, module: &str) -> Result<()> {
    let store = app.progress.activity_store();
    let catalog = store.catalog().await?;
    let completed = completed_lessons(&store.activity_records(user).await?);

    let lessons = module_gate(&catalog, module, &completed);
    if lessons.is_empty() {
        println!("No lessons in module {}.", module);
        return Ok(());
    }

    println!("Module {} ({} lessons):\n", module, lessons.len());
    for (lesson, status) in lessons {
        let label = match status.state() {
            LessonState::Completed => "Review",
            LessonState::Unlocked if status.can_start => "Start",
            LessonState::Unlocked => "Coming soon",
            LessonState::Locked => "Locked",
        };
        println!("  {:>3}. [{}] {}", lesson.order, label, lesson.display_name());
        if let Some(reason) = &status.lock_reason {
            if !status.is_completed {
                println!("       {}", reason);
            }
        }
    }

    Ok(())
}
