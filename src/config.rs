//! Widget configuration and defaults.
//!
//! Hosts configure widgets with ISO-8601 strings. Unreadable strings do not
//! fail construction: the affected instant is left unset and the widget shows
//! zeros. Use the `try_` constructors to surface the parse error instead.

use crate::breakdown::Mode;
use crate::countup::CountUpPreset;
use crate::time::{Millis, Timestamp, TimestampError};

/// Reference instant used when the host supplies none.
pub const DEFAULT_TARGET: &str = "2026-01-24T21:00:00Z";

/// Pause between count-up completion and the fade.
pub const DEFAULT_HOLD: Millis = Millis(2_000);

/// Length of the fade between the two presentations.
pub const DEFAULT_FADE: Millis = Millis(500);

fn parse_or_unset(input: &str) -> Option<Timestamp> {
    match Timestamp::parse_iso8601(input) {
        Ok(ts) => Some(ts),
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("ignoring unreadable timestamp: {}", _err);
            None
        }
    }
}

/// Configuration of a single live clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    reference: Option<Timestamp>,
    mode: Mode,
}

impl ClockConfig {
    /// Parses `reference`, leaving it unset if unreadable.
    pub fn new(reference: &str, mode: Mode) -> Self {
        Self {
            reference: parse_or_unset(reference),
            mode,
        }
    }

    /// Parses `reference`.
    ///
    /// # Errors
    /// Returns the [`TimestampError`] for unreadable input.
    pub fn try_new(reference: &str, mode: Mode) -> Result<Self, TimestampError> {
        Ok(Self {
            reference: Some(Timestamp::parse_iso8601(reference)?),
            mode,
        })
    }

    pub fn from_timestamp(reference: Timestamp, mode: Mode) -> Self {
        Self {
            reference: Some(reference),
            mode,
        }
    }

    pub fn reference(&self) -> Option<Timestamp> {
        self.reference
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig::new(DEFAULT_TARGET, Mode::Countdown)
    }
}

/// Configuration of the dual-phase tenure widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TenureConfig {
    /// Instant the tenure started; survival days count from here.
    pub start: Option<Timestamp>,
    /// Instant of the match the strike clock counts down to.
    pub match_date: Option<Timestamp>,
    pub preset: CountUpPreset,
    /// Pause after the count-up before fading.
    pub hold: Millis,
    /// Fade length.
    pub fade: Millis,
}

impl TenureConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TenureConfigBuilder {
        TenureConfigBuilder::new()
    }
}

impl Default for TenureConfig {
    fn default() -> Self {
        Self {
            start: None,
            match_date: None,
            preset: CountUpPreset::default(),
            hold: DEFAULT_HOLD,
            fade: DEFAULT_FADE,
        }
    }
}

/// Builder for [`TenureConfig`].
#[derive(Debug, Clone)]
pub struct TenureConfigBuilder {
    start: Result<Timestamp, TimestampError>,
    match_date: Result<Timestamp, TimestampError>,
    preset: CountUpPreset,
    hold: Millis,
    fade: Millis,
}

impl TenureConfigBuilder {
    pub fn new() -> Self {
        Self {
            start: Err(TimestampError::Missing),
            match_date: Err(TimestampError::Missing),
            preset: CountUpPreset::default(),
            hold: DEFAULT_HOLD,
            fade: DEFAULT_FADE,
        }
    }

    /// Sets the tenure start from an ISO-8601 string.
    pub fn start(mut self, start: &str) -> Self {
        self.start = Timestamp::parse_iso8601(start);
        self
    }

    /// Sets the match instant from an ISO-8601 string.
    pub fn match_date(mut self, match_date: &str) -> Self {
        self.match_date = Timestamp::parse_iso8601(match_date);
        self
    }

    pub fn start_at(mut self, start: Timestamp) -> Self {
        self.start = Ok(start);
        self
    }

    pub fn match_at(mut self, match_date: Timestamp) -> Self {
        self.match_date = Ok(match_date);
        self
    }

    /// Sets the count-up preset. Default is [`CountUpPreset::BRISK`].
    pub fn preset(mut self, preset: CountUpPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn hold(mut self, hold: Millis) -> Self {
        self.hold = hold;
        self
    }

    pub fn fade(mut self, fade: Millis) -> Self {
        self.fade = fade;
        self
    }

    /// Builds the configuration, leaving unreadable instants unset.
    pub fn build(self) -> TenureConfig {
        TenureConfig {
            start: self.start.ok(),
            match_date: self.match_date.ok(),
            preset: self.preset,
            hold: self.hold,
            fade: self.fade,
        }
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// Returns the first [`TimestampError`], checking `start` before `match_date`.
    pub fn try_build(self) -> Result<TenureConfig, TimestampError> {
        Ok(TenureConfig {
            start: Some(self.start?),
            match_date: Some(self.match_date?),
            preset: self.preset,
            hold: self.hold,
            fade: self.fade,
        })
    }
}

impl Default for TenureConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
