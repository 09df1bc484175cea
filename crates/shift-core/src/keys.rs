//! Store key names.
//!
//! These are part of the persisted format: renaming one orphans every
//! existing installation's data, so treat them as frozen.

use chrono::NaiveDate;

/// Rolling 7-day window of `DayRecord`s.
pub const WEEK_DATA: &str = "week_data";

/// Current streak counter (JSON number).
pub const STREAK: &str = "streak";

/// Longest streak ever reached (JSON number).
pub const LONGEST_STREAK: &str = "longest_streak";

/// Last day the app was opened, used for rollover detection.
pub const CURRENT_DATE: &str = "current_date";

/// Timestamp of the last automatic content generation.
pub const LAST_AUTO_GEN: &str = "last_auto_gen";

/// The full planner timeline collection.
pub const PLANNER_TIMELINES: &str = "planner_timelines";

/// Draft exported from the planner for the content generator.
pub const CONTENT_DRAFT: &str = "content_draft";

/// Per-day task list key: `tasks_2026-08-29`.
pub fn tasks_key(date: NaiveDate) -> String {
    format!("tasks_{}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_key_uses_iso_date() {
        let d = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(tasks_key(d), "tasks_2026-08-29");
    }
}
