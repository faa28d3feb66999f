//! Heartbeat audio toggle.
//!
//! Schedules a "lub-dub" pair of low sine thumps roughly seventy times a
//! minute, plus an occasional monitor beep. Sound generation belongs to the
//! host: implement [`ToneSynth`] for your audio backend and the toggle tells it
//! which [`Tone`] to play and when.

use crate::time::{Millis, TimeDuration, TimeInstant, TimeSource};
use crate::types::ServiceTiming;

/// Time between heartbeats (~70 BPM).
pub const BEAT_INTERVAL: Millis = Millis(850);

/// Offset of the second thump within a beat.
pub const DUB_OFFSET: Millis = Millis(200);

/// Offset of the monitor beep within a beat.
pub const BEEP_OFFSET: Millis = Millis(400);

/// Chance that a beat carries a monitor beep.
pub const BEEP_PROBABILITY: f32 = 0.3;

/// Gain that envelopes decay to. Exponential ramps cannot reach zero.
pub const SILENCE_GAIN: f32 = 0.001;

/// Parameters of a single synthesized tone.
///
/// The gain rises linearly from zero to `peak_gain` over `attack`, then decays
/// exponentially to [`SILENCE_GAIN`] at `length`, when the tone stops. If
/// `sweep_to_hz` is set, the pitch falls exponentially from `frequency_hz` to it
/// over `sweep`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    pub frequency_hz: f32,
    pub sweep_to_hz: Option<f32>,
    pub sweep: Millis,
    pub peak_gain: f32,
    pub attack: Millis,
    pub length: Millis,
}

/// First thump of a heartbeat.
pub const LUB: Tone = Tone {
    frequency_hz: 60.0,
    sweep_to_hz: Some(10.0),
    sweep: Millis(150),
    peak_gain: 0.4,
    attack: Millis(50),
    length: Millis(300),
};

/// Second, softer thump.
pub const DUB: Tone = Tone {
    frequency_hz: 50.0,
    sweep_to_hz: Some(10.0),
    sweep: Millis(150),
    peak_gain: 0.3,
    attack: Millis(50),
    length: Millis(300),
};

/// Short high monitor beep.
pub const BEEP: Tone = Tone {
    frequency_hz: 1000.0,
    sweep_to_hz: None,
    sweep: Millis(0),
    peak_gain: 0.05,
    attack: Millis(10),
    length: Millis(100),
};

/// Trait for abstracting the audio backend.
pub trait ToneSynth {
    /// Schedules `tone` to start `offset` after the current beat.
    fn play(&mut self, tone: &Tone, offset: Millis);

    /// Whether the backend can currently produce sound.
    ///
    /// Beats that fall while this is false are dropped, not queued.
    fn is_running(&self) -> bool {
        true
    }
}

/// Decides whether a beat carries a monitor beep.
///
/// Implemented for any `FnMut() -> bool`, so hosts can pass a closure over
/// their random source, e.g. `|| rng.random::<f32>() < BEEP_PROBABILITY`.
pub trait BeepChance {
    fn roll(&mut self) -> bool;
}

impl<F: FnMut() -> bool> BeepChance for F {
    fn roll(&mut self) -> bool {
        self()
    }
}

/// On/off switch for the heartbeat.
pub struct HeartbeatToggle<'t, I: TimeInstant, T: TimeSource<I>> {
    time_source: &'t T,
    next_beat: Option<I>,
}

impl<'t, I: TimeInstant, T: TimeSource<I>> HeartbeatToggle<'t, I, T> {
    /// Creates a disabled toggle.
    pub fn new(time_source: &'t T) -> Self {
        Self {
            time_source,
            next_beat: None,
        }
    }

    /// Enables the heartbeat. The first beat falls one interval from now.
    ///
    /// Enabling an enabled toggle keeps its current schedule.
    pub fn enable(&mut self) -> ServiceTiming<I::Duration> {
        if self.next_beat.is_none() {
            let now = self.time_source.now();
            self.next_beat = now.checked_add(I::Duration::from_millis(BEAT_INTERVAL.0));
            #[cfg(feature = "defmt")]
            defmt::debug!("heartbeat enabled");
        }
        self.timing(self.time_source.now())
    }

    /// Disables the heartbeat, dropping the pending beat. Idempotent.
    pub fn disable(&mut self) {
        self.next_beat = None;
    }

    /// Flips the toggle and returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }

    pub fn is_enabled(&self) -> bool {
        self.next_beat.is_some()
    }

    /// Plays the beat if one is due.
    ///
    /// Missed beats are not replayed; at most one beat plays per call.
    ///
    /// # Returns
    /// - `ServiceTiming::Delay(d)` - Next beat is due after `d`
    /// - `ServiceTiming::Complete` - Toggle is disabled
    pub fn service<S: ToneSynth, C: BeepChance>(
        &mut self,
        synth: &mut S,
        chance: &mut C,
    ) -> ServiceTiming<I::Duration> {
        let Some(due) = self.next_beat else {
            return ServiceTiming::Complete;
        };

        let now = self.time_source.now();
        let behind = now.duration_since(due).as_millis();
        let not_yet = due.duration_since(now).as_millis() > 0;
        if not_yet {
            return self.timing(now);
        }

        if synth.is_running() {
            synth.play(&LUB, Millis(0));
            synth.play(&DUB, DUB_OFFSET);
            if chance.roll() {
                synth.play(&BEEP, BEEP_OFFSET);
            }
        }

        let skipped = behind / BEAT_INTERVAL.0;
        let advance = (skipped + 1).saturating_mul(BEAT_INTERVAL.0);
        self.next_beat = due
            .checked_add(I::Duration::from_millis(advance))
            .or_else(|| now.checked_add(I::Duration::from_millis(BEAT_INTERVAL.0)));
        self.timing(now)
    }

    fn timing(&self, now: I) -> ServiceTiming<I::Duration> {
        match self.next_beat {
            Some(due) => ServiceTiming::Delay(due.duration_since(now)),
            None => ServiceTiming::Complete,
        }
    }
}
