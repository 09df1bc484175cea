//! Streak/consistency engine.
//!
//! Derives the 7-day window, the streak counters, and the identity tier
//! from today's task list. All state lives in the injected store; the
//! engine is a pure reduction over it and is safe to re-apply.

use crate::clock::Clock;
use crate::error::Result;
use crate::keys;
use crate::store::{self, Store};
use crate::task::{self, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Streak values that trigger a one-time celebration.
pub const MILESTONES: [u32; 5] = [7, 30, 90, 180, 365];

/// Maximum number of days kept in the rolling window.
pub const WINDOW_DAYS: usize = 7;

// ---------------------------------------------------------------------------
// DayRecord / window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
}

/// Load the 7-day window; corrupt or absent data reads as empty.
pub fn load_week(store: &dyn Store) -> Vec<DayRecord> {
    store::read_json(store, keys::WEEK_DATA).unwrap_or_default()
}

pub fn save_week(store: &dyn Store, week: &[DayRecord]) -> Result<()> {
    store::write_json(store, keys::WEEK_DATA, &week)
}

/// Insert or replace the record for its date, keeping the window sorted
/// ascending and at most `WINDOW_DAYS` long (oldest dropped first).
pub fn upsert_day(week: &mut Vec<DayRecord>, record: DayRecord) {
    match week.iter_mut().find(|d| d.date == record.date) {
        Some(existing) => *existing = record,
        None => week.push(record),
    }
    week.sort_by_key(|d| d.date);
    if week.len() > WINDOW_DAYS {
        let excess = week.len() - WINDOW_DAYS;
        week.drain(..excess);
    }
}

/// Completion rate over the whole window, rounded to a percentage.
/// A window with zero tasks rates 0, not NaN.
pub fn week_rate(week: &[DayRecord]) -> u32 {
    let completed: u32 = week.iter().map(|d| d.completed).sum();
    let total: u32 = week.iter().map(|d| d.total).sum();
    if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    }
}

// ---------------------------------------------------------------------------
// DayPhase
// ---------------------------------------------------------------------------

/// Where today stands, derived from its day record. The streak transition
/// guard is a total function over these states rather than an ad-hoc
/// boolean comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    NotStarted,
    InProgress,
    Completed,
}

impl DayPhase {
    pub fn of(record: Option<&DayRecord>) -> Self {
        match record {
            None => DayPhase::NotStarted,
            Some(r) if r.total == 0 => DayPhase::NotStarted,
            Some(r) if r.completed >= r.total => DayPhase::Completed,
            Some(_) => DayPhase::InProgress,
        }
    }
}

// ---------------------------------------------------------------------------
// StreakState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
}

/// Load both counters. Corrupt or missing values read as zero, and
/// `longest` is clamped so it never reports below `current`.
pub fn load_streak(store: &dyn Store) -> StreakState {
    let current: u32 = store::read_json(store, keys::STREAK).unwrap_or(0);
    let longest: u32 = store::read_json(store, keys::LONGEST_STREAK).unwrap_or(0);
    StreakState {
        current,
        longest: longest.max(current),
    }
}

pub fn save_streak(store: &dyn Store, state: StreakState) -> Result<()> {
    store::write_json(store, keys::STREAK, &state.current)?;
    store::write_json(store, keys::LONGEST_STREAK, &state.longest)
}

// ---------------------------------------------------------------------------
// Identity tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Legend,
    Master,
    Builder,
    Rookie,
    Warrior,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Legend => "90-Day Legend",
            Tier::Master => "30-Day Master",
            Tier::Builder => "14-Day Builder",
            Tier::Rookie => "7-Day Rookie",
            Tier::Warrior => "Day 1 Warrior",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tier thresholds: 90 / 30 / 14 / 7, ties resolving upward.
pub fn identity_tier(current: u32) -> Tier {
    match current {
        n if n >= 90 => Tier::Legend,
        n if n >= 30 => Tier::Master,
        n if n >= 14 => Tier::Builder,
        n if n >= 7 => Tier::Rookie,
        _ => Tier::Warrior,
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Result of re-running the engine after a task-list change.
#[derive(Debug, Clone, Serialize)]
pub struct StreakUpdate {
    pub state: StreakState,
    pub phase: DayPhase,
    pub week: Vec<DayRecord>,
    pub week_rate: u32,
    /// Set only on the mutation that crosses a milestone value.
    pub milestone: Option<u32>,
}

/// Re-derive everything from today's task list after a mutation.
///
/// Upserts today's `{completed, total}` into the window, then evaluates the
/// streak transition exactly once against the phase today was in *before*
/// this change:
///
/// - all tasks complete (non-empty) and today was not yet `Completed` →
///   streak increments, longest follows, milestone fires on {7,30,90,180,365};
/// - not all complete, streak > 0, today not yet `Completed` → streak resets
///   to 0 (and cannot re-fire, since the streak is now 0);
/// - otherwise the counters are untouched.
///
/// An empty task list never counts as complete.
pub fn apply_change(
    store: &dyn Store,
    clock: &dyn Clock,
    tasks: &[Task],
) -> Result<StreakUpdate> {
    let today = clock.today();

    let mut week = load_week(store);
    let phase_before = DayPhase::of(week.iter().find(|d| d.date == today));

    let record = DayRecord {
        date: today,
        completed: task::completed_count(tasks),
        total: tasks.len() as u32,
    };
    upsert_day(&mut week, record.clone());
    save_week(store, &week)?;

    let mut state = load_streak(store);
    let all_complete = !tasks.is_empty() && tasks.iter().all(|t| t.completed);

    let mut milestone = None;
    if all_complete && phase_before != DayPhase::Completed {
        state.current += 1;
        if state.current > state.longest {
            state.longest = state.current;
        }
        if MILESTONES.contains(&state.current) {
            milestone = Some(state.current);
        }
        save_streak(store, state)?;
        tracing::debug!(streak = state.current, "day completed, streak advanced");
    } else if !all_complete && state.current > 0 && phase_before != DayPhase::Completed {
        state.current = 0;
        save_streak(store, state)?;
        tracing::debug!("completion lost before day was recorded, streak reset");
    }

    Ok(StreakUpdate {
        state,
        phase: DayPhase::of(Some(&record)),
        week_rate: week_rate(&week),
        week,
        milestone,
    })
}

// ---------------------------------------------------------------------------
// Day rollover
// ---------------------------------------------------------------------------

/// Detect a calendar-day change against the stored marker. On rollover the
/// new day starts with an empty task list (no default seed) and a zero
/// record appended to the window. Returns whether a rollover happened.
///
/// The very first call on a fresh store only records the marker: there is
/// no previous day to close out, and clearing would defeat the first-run
/// default seed in [`crate::task::load_today`].
pub fn rollover(store: &dyn Store, clock: &dyn Clock) -> Result<bool> {
    let today = clock.today();
    let marker: Option<NaiveDate> = store::read_json(store, keys::CURRENT_DATE);
    if marker == Some(today) {
        return Ok(false);
    }
    if marker.is_none() {
        store::write_json(store, keys::CURRENT_DATE, &today)?;
        return Ok(false);
    }

    store::write_json(store, &keys::tasks_key(today), &Vec::<Task>::new())?;

    let mut week = load_week(store);
    if !week.iter().any(|d| d.date == today) {
        upsert_day(
            &mut week,
            DayRecord {
                date: today,
                completed: 0,
                total: 0,
            },
        );
        save_week(store, &week)?;
    }

    store::write_json(store, keys::CURRENT_DATE, &today)?;
    tracing::info!(%today, "rolled over to a new day");
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn record(d: u32, completed: u32, total: u32) -> DayRecord {
        DayRecord {
            date: day(d),
            completed,
            total,
        }
    }

    fn one_task(completed: bool) -> Vec<Task> {
        let mut t = Task::new("Write 500 words");
        t.completed = completed;
        vec![t]
    }

    #[test]
    fn upsert_keeps_window_sorted_and_bounded() {
        let mut week = Vec::new();
        // Insert out of order, more than seven days.
        for d in [5u32, 3, 8, 1, 7, 2, 6, 4, 9] {
            upsert_day(&mut week, record(d, 1, 2));
        }
        assert_eq!(week.len(), WINDOW_DAYS);
        assert!(week.windows(2).all(|w| w[0].date < w[1].date));
        // Oldest entries dropped.
        assert_eq!(week[0].date, day(3));
        assert_eq!(week.last().unwrap().date, day(9));
    }

    #[test]
    fn upsert_replaces_existing_date() {
        let mut week = vec![record(1, 0, 2)];
        upsert_day(&mut week, record(1, 2, 2));
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].completed, 2);
    }

    #[test]
    fn week_rate_bounds() {
        assert_eq!(week_rate(&[]), 0);
        assert_eq!(week_rate(&[record(1, 0, 0)]), 0);
        assert_eq!(week_rate(&[record(1, 3, 4)]), 75);
        assert_eq!(week_rate(&[record(1, 4, 4), record(2, 4, 4)]), 100);
        assert_eq!(week_rate(&[record(1, 2, 3)]), 67);
    }

    #[test]
    fn completing_all_tasks_increments_streak_once() {
        let store = MemoryStore::new();
        let clock = FixedClock::on_day(day(29));

        let update = apply_change(&store, &clock, &one_task(true)).unwrap();
        assert_eq!(update.state.current, 1);
        assert_eq!(update.state.longest, 1);
        assert_eq!(update.phase, DayPhase::Completed);

        // Re-applying with the day already completed is a no-op.
        let again = apply_change(&store, &clock, &one_task(true)).unwrap();
        assert_eq!(again.state.current, 1);
        assert_eq!(again.milestone, None);
    }

    #[test]
    fn scenario_single_task_toggle() {
        // tasks = [{text:"Write 500 words", completed:false}] → toggle →
        // streak 0→1 and today's record becomes {completed:1, total:1}.
        let store = MemoryStore::new();
        let clock = FixedClock::on_day(day(29));

        let update = apply_change(&store, &clock, &one_task(false)).unwrap();
        assert_eq!(update.state.current, 0);
        assert_eq!(update.phase, DayPhase::InProgress);

        let update = apply_change(&store, &clock, &one_task(true)).unwrap();
        assert_eq!(update.state.current, 1);
        let today = update.week.iter().find(|d| d.date == day(29)).unwrap();
        assert_eq!((today.completed, today.total), (1, 1));
    }

    #[test]
    fn empty_list_never_counts_as_complete() {
        let store = MemoryStore::new();
        let clock = FixedClock::on_day(day(29));

        let update = apply_change(&store, &clock, &[]).unwrap();
        assert_eq!(update.state.current, 0);
        assert_eq!(update.phase, DayPhase::NotStarted);
        assert_eq!(update.milestone, None);
    }

    #[test]
    fn losing_completion_resets_once() {
        let store = MemoryStore::new();
        let clock = FixedClock::on_day(day(29));
        save_streak(
            &store,
            StreakState {
                current: 5,
                longest: 9,
            },
        )
        .unwrap();

        // Day in progress, streak carried from yesterday, now broken.
        let update = apply_change(&store, &clock, &one_task(false)).unwrap();
        assert_eq!(update.state.current, 0);
        assert_eq!(update.state.longest, 9);

        // The reset does not fire again on the next mutation.
        let update = apply_change(&store, &clock, &one_task(false)).unwrap();
        assert_eq!(update.state.current, 0);
        assert_eq!(update.state.longest, 9);
    }

    #[test]
    fn longest_never_decreases() {
        let store = MemoryStore::new();
        let clock = FixedClock::on_day(day(29));
        save_streak(
            &store,
            StreakState {
                current: 3,
                longest: 10,
            },
        )
        .unwrap();

        let update = apply_change(&store, &clock, &one_task(true)).unwrap();
        assert_eq!(update.state.current, 4);
        assert_eq!(update.state.longest, 10);
        assert!(update.state.longest >= update.state.current);
    }

    #[test]
    fn milestone_fires_exactly_on_crossing() {
        let store = MemoryStore::new();
        let clock = FixedClock::on_day(day(29));
        save_streak(
            &store,
            StreakState {
                current: 6,
                longest: 6,
            },
        )
        .unwrap();

        let update = apply_change(&store, &clock, &one_task(true)).unwrap();
        assert_eq!(update.state.current, 7);
        assert_eq!(update.milestone, Some(7));

        // A later re-render-style recompute on the same day stays quiet.
        let again = apply_change(&store, &clock, &one_task(true)).unwrap();
        assert_eq!(again.state.current, 7);
        assert_eq!(again.milestone, None);
    }

    #[test]
    fn corrupt_counters_read_as_zero() {
        let store = MemoryStore::new();
        store.set(keys::STREAK, "\"not a number\"").unwrap();
        store.set(keys::LONGEST_STREAK, "{").unwrap();
        let state = load_streak(&store);
        assert_eq!(state, StreakState { current: 0, longest: 0 });
    }

    #[test]
    fn longest_clamped_on_load() {
        let store = MemoryStore::new();
        store.set(keys::STREAK, "8").unwrap();
        store.set(keys::LONGEST_STREAK, "3").unwrap();
        let state = load_streak(&store);
        assert_eq!(state.longest, 8);
    }

    #[test]
    fn identity_tier_thresholds() {
        assert_eq!(identity_tier(0), Tier::Warrior);
        assert_eq!(identity_tier(6), Tier::Warrior);
        assert_eq!(identity_tier(7), Tier::Rookie);
        assert_eq!(identity_tier(13), Tier::Rookie);
        assert_eq!(identity_tier(14), Tier::Builder);
        assert_eq!(identity_tier(29), Tier::Builder);
        assert_eq!(identity_tier(30), Tier::Master);
        assert_eq!(identity_tier(89), Tier::Master);
        assert_eq!(identity_tier(90), Tier::Legend);
        assert_eq!(identity_tier(365), Tier::Legend);
    }

    #[test]
    fn day_phase_derivation() {
        assert_eq!(DayPhase::of(None), DayPhase::NotStarted);
        assert_eq!(DayPhase::of(Some(&record(1, 0, 0))), DayPhase::NotStarted);
        assert_eq!(DayPhase::of(Some(&record(1, 1, 3))), DayPhase::InProgress);
        assert_eq!(DayPhase::of(Some(&record(1, 3, 3))), DayPhase::Completed);
    }

    #[test]
    fn rollover_clears_tasks_and_appends_zero_record() {
        let store = MemoryStore::new();
        let clock = FixedClock::on_day(day(29));

        // First run only sets the marker; there is no day to close out.
        assert!(!rollover(&store, &clock).unwrap());
        // Same day again: no-op.
        assert!(!rollover(&store, &clock).unwrap());

        clock.advance(Duration::days(1));
        assert!(rollover(&store, &clock).unwrap());

        let week = load_week(&store);
        let today = week.iter().find(|d| d.date == day(30)).unwrap();
        assert_eq!((today.completed, today.total), (0, 0));

        // New day starts empty, not with the default seed.
        let tasks =
            crate::task::load_today(&store, &clock).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn rollover_trims_window_to_seven() {
        let store = MemoryStore::new();
        let mut week = Vec::new();
        for d in 1..=7u32 {
            upsert_day(&mut week, record(d, 1, 1));
        }
        save_week(&store, &week).unwrap();
        store::write_json(&store, keys::CURRENT_DATE, &day(7)).unwrap();

        let clock = FixedClock::on_day(day(8));
        assert!(rollover(&store, &clock).unwrap());

        let week = load_week(&store);
        assert_eq!(week.len(), WINDOW_DAYS);
        assert_eq!(week[0].date, day(2));
        assert_eq!(week.last().unwrap().date, day(8));
    }
}
