#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Timestamp`**: An absolute instant in epoch milliseconds, parsed from ISO-8601
//! - **`Breakdown`**: A duration split into days, hours, minutes and seconds
//! - **`Mode`**: Whether a clock measures time elapsed since or remaining until its reference
//! - **`LiveClock`**: Publishes a fresh breakdown once per second
//! - **`CountUp`**: Animates a number from zero to a target over a fixed time
//! - **`PhaseRunner`**: Walks an ordered list of timed phases
//! - **`TenureClock`**: Count-up of days survived, then a fade, then a live match countdown
//! - **`HeartbeatToggle`**: Schedules heartbeat tones on a host audio backend
//! - **`TimeSource`**: Trait to implement for your clock
//!
//! Every runnable is host-polled: call `service()` and sleep for the returned
//! [`ServiceTiming`] before calling again. Nothing runs in the background, so
//! dropping or disposing a widget is all it takes to stop it.

pub mod time;
pub mod types;
pub mod breakdown;
pub mod clock;
pub mod countup;
pub mod phase;
pub mod scoreboard;
pub mod command;
pub mod config;
pub mod tenure;
pub mod heartbeat;

#[cfg(test)]
pub(crate) mod test_support;

pub use time::{Millis, TimeDuration, TimeInstant, TimeSource, Timestamp, TimestampError};
#[cfg(feature = "std")]
pub use time::SystemClock;
pub use types::{RunState, ServiceTiming};
pub use breakdown::{
    Breakdown, ClockReadout, Mode, compute_breakdown, compute_breakdown_from_str,
    compute_breakdown_or_zero,
};
pub use clock::{BreakdownSink, ClockError, LIVE_TICK, LiveClock};
pub use countup::{AnimationError, AnimationState, CountUp, CountUpPreset, CountUpSink};
pub use phase::{PhaseError, PhaseObserver, PhaseRunner, PhaseSequence, PhaseStep};
pub use scoreboard::{Scoreboard, Side};
pub use command::ClockAction;
pub use config::{ClockConfig, TenureConfig, TenureConfigBuilder};
pub use tenure::{Phase, Snapshot, SnapshotSink, TenureClock, TenureError};
pub use heartbeat::{BeepChance, HeartbeatToggle, Tone, ToneSynth};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_and_defaults() {
        assert_eq!(CountUpPreset::default(), CountUpPreset::BRISK);
        assert_eq!(Mode::default(), Mode::Countdown);
        assert_eq!(LIVE_TICK, Millis(1_000));
    }
}
