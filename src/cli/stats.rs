//! Stats command implementation

use anyhow::Result;
use chrono::Utc;

use super::App;

/// Print the aggregated stats of a user
pub async fn stats_command(app: &App, user: &str) -> Result<()> {
    let stats = app.coordinator()?.user_stats(user, Utc::now()).await?;
    let level = stats.level();

    println!("Progress for {}:\n", user);
    match level.next_level_xp {
        Some(next) => println!(
            "  Level {} {} ({} / {} XP, {:.0}%)",
            level.level,
            level.title,
            level.xp,
            next,
            level.progress_to_next() * 100.0
        ),
        None => println!("  Level {} {} ({} XP, max level)", level.level, level.title, level.xp),
    }
    println!("  Lessons completed: {}", stats.lessons_completed);
    println!("  Perfect scores:    {}", stats.perfect_scores);
    println!("  Average score:     {}", stats.avg_score);
    println!("  Current streak:    {} day(s)", stats.current_streak);
    println!("  Longest streak:    {} day(s)", stats.longest_streak);
    if let Some(day) = stats.last_active {
        println!("  Last active:       {}", day);
    }
    println!("  Videos watched:    {}", stats.videos_watched);

    if stats.modules_completed.is_empty() {
        return Ok(());
    }

    println!("\nModules:");
    for (module_id, completed) in &stats.modules_completed {
        let marker = if *completed { "done" } else { "    " };
        println!(
            "  [{}] {} - {} lesson(s), {}%",
            marker,
            module_id,
            stats.module_lessons(module_id),
            stats.module_percentage(module_id)
        );
    }

    Ok(())
}
