//! Calendar-style decomposition of elapsed or remaining time.

use crate::time::{Timestamp, TimestampError};

pub const MILLIS_PER_SECOND: u64 = 1_000;
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Which way a duration is measured against the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Time since a past reference instant (`now - reference`).
    Elapsed,

    /// Time left until a future reference instant (`reference - now`).
    #[default]
    Countdown,
}

impl Mode {
    /// Signed milliseconds between `reference` and `now` in this mode.
    #[inline]
    pub fn signed_duration(&self, reference: Timestamp, now: Timestamp) -> i64 {
        match self {
            Mode::Elapsed => reference.millis_until(now),
            Mode::Countdown => now.millis_until(reference),
        }
    }
}

/// A duration split into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Breakdown {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Breakdown {
    /// All fields zero. Shown for past countdowns and unreadable dates.
    pub const ZERO: Self = Breakdown {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Splits a non-negative duration. Sub-second remainders are dropped.
    pub fn from_millis(millis: u64) -> Self {
        Breakdown {
            days: millis / MILLIS_PER_DAY,
            hours: ((millis / MILLIS_PER_HOUR) % 24) as u8,
            minutes: ((millis / MILLIS_PER_MINUTE) % 60) as u8,
            seconds: ((millis / MILLIS_PER_SECOND) % 60) as u8,
        }
    }

    /// Splits a signed duration, clamping zero and negative values to [`Breakdown::ZERO`].
    pub fn from_signed_millis(millis: i64) -> Self {
        if millis <= 0 {
            return Breakdown::ZERO;
        }
        Breakdown::from_millis(millis.unsigned_abs())
    }

    /// Reassembles the breakdown into milliseconds, saturating on overflow.
    pub fn total_millis(&self) -> u64 {
        self.days
            .saturating_mul(MILLIS_PER_DAY)
            .saturating_add(self.hours as u64 * MILLIS_PER_HOUR)
            .saturating_add(self.minutes as u64 * MILLIS_PER_MINUTE)
            .saturating_add(self.seconds as u64 * MILLIS_PER_SECOND)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Breakdown::ZERO
    }

    /// The within-day part of the breakdown, as a strike clock displays it.
    #[inline]
    pub fn clock_readout(&self) -> ClockReadout {
        ClockReadout {
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        }
    }
}

/// Hours, minutes and seconds with whole days dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReadout {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockReadout {
    pub const ZERO: Self = ClockReadout {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };
}

impl core::fmt::Display for ClockReadout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl core::fmt::Display for Breakdown {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Computes the breakdown of `reference` against `now`.
///
/// Durations that are zero or negative for the mode (a countdown whose target
/// has passed, an elapsed clock whose start is in the future) yield
/// [`Breakdown::ZERO`].
pub fn compute_breakdown(reference: Timestamp, now: Timestamp, mode: Mode) -> Breakdown {
    Breakdown::from_signed_millis(mode.signed_duration(reference, now))
}

/// Like [`compute_breakdown`], with an optional reference that may have failed to parse.
pub fn compute_breakdown_or_zero(
    reference: Result<Timestamp, TimestampError>,
    now: Timestamp,
    mode: Mode,
) -> Breakdown {
    match reference {
        Ok(reference) => compute_breakdown(reference, now, mode),
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("unreadable reference instant: {}", _err);
            Breakdown::ZERO
        }
    }
}

/// Parses `reference` as ISO-8601 and computes its breakdown, degrading to zero.
pub fn compute_breakdown_from_str(reference: &str, now: Timestamp, mode: Mode) -> Breakdown {
    compute_breakdown_or_zero(Timestamp::parse_iso8601(reference), now, mode)
}
