//! Check command implementation

use anyhow::Result;

use super::{App, print_pending_rewards, print_unlocked};

pub async fn check_command(app: &App, user: &str) -> Result<()> {
    let report = app.coordinator()?.check_and_unlock(user).await?;

    if report.unlocked.is_empty() {
        println!("No new achievements.");
    } else {
        println!("New achievements ({}):\n", report.unlocked.len());
        print_unlocked(&report.unlocked);
    }
    print_pending_rewards(&report.rewards_pending);
    Ok(())
}
