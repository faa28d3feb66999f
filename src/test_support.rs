//! Shared helpers for unit tests.

use crate::time::{Millis, TimeInstant, TimeSource, Timestamp};
use core::cell::Cell;

/// Wall clock that only moves when told to.
pub(crate) struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    /// Starts at the Unix epoch.
    pub(crate) fn new() -> Self {
        Self::at(0)
    }

    /// Starts at the given epoch milliseconds.
    pub(crate) fn at(millis: i64) -> Self {
        Self {
            now: Cell::new(Timestamp::from_epoch_millis(millis)),
        }
    }

    pub(crate) fn advance(&self, millis: u64) {
        let now = self.now.get();
        self.now.set(now.checked_add(Millis(millis)).unwrap());
    }
}

impl TimeSource<Timestamp> for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
