//! Achievements and points commands

use anyhow::Result;
use chrono::Utc;

use super::App;

/// List every achievement with unlock state and progress
pub async fn achievements_command(app: &App, user: &str) -> Result<()> {
    let report = app.coordinator()?.progress_report(user, Utc::now()).await?;

    if report.is_empty() {
        println!("No achievements defined.");
        return Ok(());
    }

    let unlocked = report.iter().filter(|a| a.unlocked).count();
    println!("Achievements ({}/{}):\n", unlocked, report.len());

    for entry in &report {
        let def = &entry.definition;
        let marker = if entry.unlocked { "x" } else { " " };
        println!(
            "  [{}] {} ({}, {} points) - {}/{}",
            marker,
            def.title,
            def.rarity.as_str(),
            def.reward_points,
            entry.progress.current,
            entry.progress.target
        );
        if !def.description.is_empty() {
            println!("      {}", def.description);
        }
    }

    Ok(())
}

pub async fn points_command(app: &App, user: &str) -> Result<()> {
    let summary = app.coordinator()?.summary(user).await?;
    println!(
        "{}: {} points, {} achievement(s)",
        user, summary.total_points, summary.achievements_unlocked
    );
    Ok(())
}
