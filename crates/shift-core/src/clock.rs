//! Injected time capability.
//!
//! Day rollover and the midnight countdown are driven by a `Clock` rather
//! than `Utc::now()` calls, so tests can advance time without real delays.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::RwLock;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar-day key for "today". Days are UTC calendar days.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Time remaining until the next UTC midnight.
    fn until_midnight(&self) -> Duration {
        let now = self.now();
        let midnight = (now.date_naive() + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        midnight - now
    }
}

// ---------------------------------------------------------------------------
// SystemClock
// ---------------------------------------------------------------------------

#[derive(Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ---------------------------------------------------------------------------
// FixedClock
// ---------------------------------------------------------------------------

/// Test clock pinned to a settable instant.
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn on_day(date: NaiveDate) -> Self {
        Self::at(
            date.and_hms_opt(12, 0, 0)
                .expect("noon is a valid time")
                .and_utc(),
        )
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().expect("clock lock") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().expect("clock lock");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let clock = FixedClock::on_day(date);
        assert_eq!(clock.today(), date);

        clock.advance(Duration::days(1));
        assert_eq!(clock.today(), date + Duration::days(1));
    }

    #[test]
    fn until_midnight_is_positive_and_bounded() {
        let clock = FixedClock::at(
            NaiveDate::from_ymd_opt(2026, 8, 29)
                .unwrap()
                .and_hms_opt(23, 59, 30)
                .unwrap()
                .and_utc(),
        );
        let left = clock.until_midnight();
        assert_eq!(left, Duration::seconds(30));
    }

    #[test]
    fn until_midnight_at_day_start() {
        let clock = FixedClock::at(
            NaiveDate::from_ymd_opt(2026, 8, 29)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc(),
        );
        assert_eq!(clock.until_midnight(), Duration::days(1));
    }
}
