//! Context builder.
//!
//! Projects the stored activity into one natural-language paragraph for the
//! content-generation prompt. Each sentence is independently optional: a
//! missing or unparsable source simply drops its fragment, it never fails.

use crate::clock::Clock;
use crate::keys;
use crate::store::{self, Store};
use crate::streak::{self, DayRecord};
use crate::task::Task;
use crate::timeline::{Role, TimelineSet};

/// Maximum number of recent assistant messages quoted in the summary.
const MAX_INSIGHTS: usize = 5;

/// Build the activity summary, fragment order fixed:
/// streak → today's tasks → week consistency → recent insights.
pub fn build_context(store: &dyn Store, clock: &dyn Clock) -> String {
    let mut fragments: Vec<String> = Vec::new();

    if let Some(f) = streak_fragment(store) {
        fragments.push(f);
    }
    if let Some(f) = tasks_fragment(store, clock) {
        fragments.push(f);
    }
    if let Some(f) = week_fragment(store) {
        fragments.push(f);
    }
    if let Some(f) = insights_fragment(store) {
        fragments.push(f);
    }

    fragments.join(" ")
}

fn streak_fragment(store: &dyn Store) -> Option<String> {
    let current: u32 = store::read_json(store, keys::STREAK)?;
    let longest: u32 = store::read_json(store, keys::LONGEST_STREAK).unwrap_or(current);
    Some(format!(
        "The author is on a {current}-day completion streak (longest ever: {}).",
        longest.max(current)
    ))
}

fn tasks_fragment(store: &dyn Store, clock: &dyn Clock) -> Option<String> {
    let tasks: Vec<Task> = store::read_json(store, &keys::tasks_key(clock.today()))?;
    if tasks.is_empty() {
        return None;
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    let names: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
    Some(format!(
        "Today's tasks ({done}/{} done): {}.",
        tasks.len(),
        names.join(", ")
    ))
}

fn week_fragment(store: &dyn Store) -> Option<String> {
    let week: Vec<DayRecord> = store::read_json(store, keys::WEEK_DATA)?;
    let total: u32 = week.iter().map(|d| d.total).sum();
    if total == 0 {
        return None;
    }
    Some(format!(
        "7-day consistency: {}% of planned tasks completed.",
        streak::week_rate(&week)
    ))
}

fn insights_fragment(store: &dyn Store) -> Option<String> {
    let set: TimelineSet = store::read_json(store, keys::PLANNER_TIMELINES)?;

    let mut replies: Vec<(i64, &str)> = set
        .timelines
        .iter()
        .flat_map(|t| t.messages.iter())
        .filter(|m| m.role == Role::Assistant)
        .map(|m| (m.timestamp, m.content.as_str()))
        .collect();
    if replies.is_empty() {
        return None;
    }

    // Newest first across all timelines.
    replies.sort_by(|a, b| b.0.cmp(&a.0));
    replies.truncate(MAX_INSIGHTS);

    let quoted: Vec<String> = replies.iter().map(|(_, c)| format!("\"{c}\"")).collect();
    Some(format!(
        "Recent planning insights: {}.",
        quoted.join("; ")
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
