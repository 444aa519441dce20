//! Record command implementation

use anyhow::{Context, Result};
use chrono::Utc;

use lingua_progress::ActivityRecord;

use super::{App, print_pending_rewards, print_unlocked};

/// Save one completion and report any achievements it unlocked
pub async fn record_command(
    app: &App,
    user: &str,
    lesson: &str,
    module: &str,
    score: Option<u32>,
    video: bool,
) -> Result<()> {
    let now = Utc::now().timestamp_millis();
    let record = if video {
        ActivityRecord::video(user, lesson, module, now)
    } else {
        ActivityRecord::lesson(user, lesson, module, score, now)
    };

    let outcome = app
        .coordinator()?
        .record_completion(record)
        .await
        .with_context(|| format!("Failed to record completion of {}", lesson))?;

    println!("Recorded {} for {}", lesson, user);
    if outcome.achievements_pending {
        println!("Achievement check did not finish; run `lingua-progress check --user {}`", user);
    }
    print_unlocked(&outcome.unlocked);
    print_pending_rewards(&outcome.rewards_pending);

    Ok(())
}
