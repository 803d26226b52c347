//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and when the `test-support` feature is on.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use mockable::Clock;
/// use prowd_backend::test_support::MutableClock;
///
/// let clock = MutableClock::at_epoch_of_tests();
/// let before = clock.utc();
/// clock.advance_seconds(5);
/// assert_eq!((clock.utc() - before).num_seconds(), 5);
/// ```
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock frozen at 2024-01-01T00:00:00Z.
    pub fn at_epoch_of_tests() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();
        Self::new(start)
    }

    /// Move the clock forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
