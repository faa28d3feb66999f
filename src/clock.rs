//! Live one-second refresh of a breakdown against a reference instant.
//!
//! [`LiveClock`] is the ticking face of a countdown or count-up widget. The host
//! services it whenever the returned delay elapses; each due tick computes a
//! fresh [`Breakdown`] and hands it to a [`BreakdownSink`] by value.

use crate::breakdown::{Breakdown, Mode, compute_breakdown};
use crate::config::ClockConfig;
use crate::time::{Millis, TimeInstant, TimeSource, Timestamp};
use crate::types::{RunState, ServiceTiming};

/// Refresh interval for live clocks.
pub const LIVE_TICK: Millis = Millis(1_000);

/// Receives a breakdown on every clock tick.
pub trait BreakdownSink {
    /// Called once per tick with the freshly computed breakdown.
    fn publish(&mut self, breakdown: Breakdown);
}

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: RunState,
    },
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ClockError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but clock is in {:?}",
                    expected, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClockError {}

/// Publishes a breakdown of `reference` once per [`LIVE_TICK`].
///
/// A clock without a reference instant (the configured date was unreadable)
/// keeps ticking and publishes [`Breakdown::ZERO`].
pub struct LiveClock<'t, T: TimeSource<Timestamp>> {
    time_source: &'t T,
    reference: Option<Timestamp>,
    mode: Mode,
    state: RunState,
    next_tick: Option<Timestamp>,
    latest: Breakdown,
}

impl<'t, T: TimeSource<Timestamp>> LiveClock<'t, T> {
    /// Creates a clock in `Ready` state.
    pub fn new(time_source: &'t T, reference: Option<Timestamp>, mode: Mode) -> Self {
        Self {
            time_source,
            reference,
            mode,
            state: RunState::Ready,
            next_tick: None,
            latest: Breakdown::ZERO,
        }
    }

    /// Creates a clock from a parsed configuration.
    pub fn from_config(time_source: &'t T, config: &ClockConfig) -> Self {
        Self::new(time_source, config.reference(), config.mode())
    }

    /// Publishes the first breakdown immediately and starts ticking.
    ///
    /// Must be called from `Ready` state.
    pub fn start<S: BreakdownSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ServiceTiming<Millis>, ClockError> {
        if self.state != RunState::Ready {
            return Err(ClockError::InvalidState {
                expected: "Ready",
                actual: self.state,
            });
        }

        let now = self.time_source.now();
        self.state = RunState::Running;
        self.next_tick = Some(now);
        Ok(self.tick(now, sink))
    }

    /// Services the clock, publishing if a tick is due.
    ///
    /// Must be called from `Running` state. Ticks missed by a late host are
    /// skipped; a single breakdown for the current instant is published.
    pub fn service<S: BreakdownSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ServiceTiming<Millis>, ClockError> {
        if self.state != RunState::Running {
            return Err(ClockError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        }

        let now = self.time_source.now();
        Ok(self.tick(now, sink))
    }

    fn tick<S: BreakdownSink>(&mut self, now: Timestamp, sink: &mut S) -> ServiceTiming<Millis> {
        let due = self.next_tick.unwrap_or(now);
        if now < due {
            return ServiceTiming::Delay(due.duration_since(now));
        }

        self.latest = match self.reference {
            Some(reference) => compute_breakdown(reference, now, self.mode),
            None => Breakdown::ZERO,
        };
        sink.publish(self.latest);

        // Keep the tick phase aligned to the start instant.
        let behind = now.duration_since(due).0;
        let skipped = behind / LIVE_TICK.0;
        let next = due
            .checked_add(Millis((skipped + 1) * LIVE_TICK.0))
            .unwrap_or(now);
        self.next_tick = Some(next);
        ServiceTiming::Delay(next.duration_since(now))
    }

    /// Stops the clock. Idempotent; nothing is published afterwards.
    pub fn dispose(&mut self) {
        if self.state != RunState::Disposed {
            #[cfg(feature = "defmt")]
            defmt::debug!("live clock disposed");
        }
        self.state = RunState::Disposed;
        self.next_tick = None;
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the most recently published breakdown.
    pub fn latest(&self) -> Breakdown {
        self.latest
    }

    pub fn reference(&self) -> Option<Timestamp> {
        self.reference
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}
