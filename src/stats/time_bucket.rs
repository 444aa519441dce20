//! Day bucketing for completion timestamps
//!
//! All buckets are UTC calendar days.

use chrono::{DateTime, NaiveDate};

/// Calendar day (UTC) of a Unix timestamp in milliseconds.
///
/// Returns `None` for timestamps chrono cannot represent.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use lingua_progress::stats::day_of;
/// assert_eq!(day_of(1703721600000), NaiveDate::from_ymd_opt(2023, 12, 28));
/// ```
pub fn day_of(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of() {
        // 2023-12-28 12:34:56 UTC
        let ts = 1703766896000i64;
        assert_eq!(day_of(ts), NaiveDate::from_ymd_opt(2023, 12, 28));
    }

    #[test]
    fn test_day_of_boundary() {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(day_of(midnight), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(day_of(midnight - 1), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_day_of_out_of_range() {
        assert!(day_of(i64::MAX).is_none());
    }
}
