//! Daily learning streaks
//!
//! A streak is a run of consecutive UTC days with at least one completion.
//! It stays alive until a whole day passes without activity.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use super::time_bucket::day_of;
use crate::domain::ActivityRecord;

/// Streak figures derived from a set of activity days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakInfo {
    /// Length of the run ending today or yesterday, 0 if broken
    pub current: u32,
    /// Longest run ever recorded
    pub longest: u32,
    pub last_active: Option<NaiveDate>,
}

impl StreakInfo {
    /// Compute streaks from activity records as of `today`.
    ///
    /// Days after `today` are ignored.
    pub fn from_records(records: &[ActivityRecord], today: NaiveDate) -> Self {
        let days: BTreeSet<NaiveDate> = records
            .iter()
            .filter_map(|r| day_of(r.completed_at))
            .filter(|d| *d <= today)
            .collect();
        Self::from_days(&days, today)
    }

    pub fn from_days(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        let last_active = days.range(..=today).next_back().copied();

        let current = match last_active {
            Some(last) if (today - last).num_days() <= 1 => run_ending_at(days, last),
            _ => 0,
        };

        let mut longest = 0;
        let mut run = 0;
        let mut prev: Option<NaiveDate> = None;
        for &day in days.range(..=today) {
            run = match prev {
                Some(p) if p.checked_add_days(Days::new(1)) == Some(day) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(day);
        }

        Self {
            current,
            longest,
            last_active,
        }
    }
}

fn run_ending_at(days: &BTreeSet<NaiveDate>, last: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = Some(last);
    while let Some(d) = day {
        if !days.contains(&d) {
            break;
        }
        count += 1;
        day = d.checked_sub_days(Days::new(1));
    }
    count
}
