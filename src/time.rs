//! Time abstraction traits and the wall-clock types the widgets run on.

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant, ZERO if `earlier` is later.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;

    /// Subtracts duration from instant, returns None on underflow.
    fn checked_sub(self, duration: Self::Duration) -> Option<Self>;
}

/// Whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u64);

impl TimeDuration for Millis {
    const ZERO: Self = Millis(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        Millis(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        Millis(self.0.saturating_sub(other.0))
    }
}

/// An absolute point in time, in milliseconds since the Unix epoch.
///
/// Negative values are instants before 1970.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Timestamp(0);

    /// Creates a timestamp from epoch milliseconds.
    #[inline]
    pub const fn from_epoch_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns epoch milliseconds.
    #[inline]
    pub const fn epoch_millis(&self) -> i64 {
        self.0
    }

    /// Signed milliseconds from `self` to `later` (negative if `later` is earlier).
    #[inline]
    pub fn millis_until(&self, later: Timestamp) -> i64 {
        later.0.saturating_sub(self.0)
    }

    /// Parses an ISO-8601 timestamp.
    ///
    /// Accepts ISO-8601 date-times with a UTC offset (`2026-01-24T21:00:00Z`,
    /// `2026-01-24T22:00:00+01:00`, `2026-01-24T21:00Z`, `2026-01-24T22:00:00.000+0100`)
    /// and plain calendar dates (`2024-01-01`), which are taken as midnight UTC.
    /// Date-times without an offset are rejected.
    ///
    /// # Errors
    /// * `Missing` - Input is empty or whitespace
    /// * `Malformed` - Input is not an accepted ISO-8601 form
    /// * `OutOfRange` - Instant does not fit in epoch milliseconds
    pub fn parse_iso8601(input: &str) -> Result<Self, TimestampError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TimestampError::Missing);
        }

        let datetime = OffsetDateTime::parse(input, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(input, &Iso8601::DEFAULT))
            .or_else(|_| {
                Date::parse(input, format_description!("[year]-[month]-[day]"))
                    .map(|date| date.midnight().assume_utc())
            })
            .map_err(|_| TimestampError::Malformed)?;

        let millis = datetime.unix_timestamp_nanos().div_euclid(1_000_000);
        i64::try_from(millis)
            .map(Timestamp)
            .map_err(|_| TimestampError::OutOfRange)
    }
}

impl core::str::FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse_iso8601(s)
    }
}

impl TimeInstant for Timestamp {
    type Duration = Millis;

    fn duration_since(&self, earlier: Self) -> Millis {
        let delta = earlier.millis_until(*self);
        Millis(u64::try_from(delta).unwrap_or(0))
    }

    fn checked_add(self, duration: Millis) -> Option<Self> {
        let millis = i64::try_from(duration.0).ok()?;
        self.0.checked_add(millis).map(Timestamp)
    }

    fn checked_sub(self, duration: Millis) -> Option<Self> {
        let millis = i64::try_from(duration.0).ok()?;
        self.0.checked_sub(millis).map(Timestamp)
    }
}

/// Errors produced when a reference instant cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimestampError {
    /// No timestamp was supplied.
    Missing,

    /// Input is not an ISO-8601 date or date-time.
    Malformed,

    /// Instant is outside the representable epoch-millisecond range.
    OutOfRange,
}

impl core::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimestampError::Missing => write!(f, "timestamp is missing"),
            TimestampError::Malformed => {
                write!(f, "timestamp is not an ISO-8601 date or date-time")
            }
            TimestampError::OutOfRange => {
                write!(f, "timestamp is outside the supported range")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimestampError {}

/// Wall clock backed by [`std::time::SystemTime`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource<Timestamp> for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => i64::try_from(since.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis())
                .map(|m| -m)
                .unwrap_or(i64::MIN),
        };
        Timestamp(millis)
    }
}
