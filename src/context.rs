//! Runtime dependencies injected into the record actors through `run(context)`.

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct RecordsContext {
    clock: Arc<dyn Clock + Send + Sync>,
}

impl RecordsContext {
    /// Context reading the system clock.
    pub fn system() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// The current time, nudged forward so that it is strictly later than `previous`.
    ///
    /// Two mutations inside one clock tick, or a clock stepping backwards, must still yield
    /// increasing `updatedAt` values.
    pub fn now_after(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.now();
        if now > previous {
            now
        } else {
            previous + TimeDelta::microseconds(1)
        }
    }
}

impl Default for RecordsContext {
    fn default() -> Self {
        Self::system()
    }
}

/// A clock that only moves when told to. Used for deterministic runs and tests.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        // The guarded value is a plain timestamp, so a poisoned lock still holds a usable one.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
