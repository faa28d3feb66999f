//! The dual-phase tenure widget.
//!
//! Mounting a [`TenureClock`] computes how many whole days have passed since the
//! configured start and animates a count-up towards that number. Once the
//! count-up lands, the widget holds for a moment, fades, and switches to a live
//! strike clock counting down to the match. Each service call publishes at most
//! one immutable [`Snapshot`], and only when something visible changed.
//!
//! ```text
//! Accumulating --(count-up done, hold)--> Transitioning --(fade)--> Live
//! ```

use crate::breakdown::{Breakdown, ClockReadout, Mode, compute_breakdown};
use crate::clock::{BreakdownSink, ClockError, LiveClock};
use crate::command::ClockAction;
use crate::config::TenureConfig;
use crate::countup::{AnimationError, AnimationState, CountUp, CountUpSink};
use crate::phase::{PhaseError, PhaseObserver, PhaseRunner, PhaseSequence};
use crate::scoreboard::Scoreboard;
use crate::time::{Millis, TimeSource, Timestamp};
use crate::types::{RunState, ServiceTiming};

/// Which presentation the widget is showing.
///
/// Transitions only move forward: `Accumulating → Transitioning → Live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Days-survived counter, animating or holding.
    Accumulating,
    /// Fading out the counter.
    Transitioning,
    /// Strike clock and scoreboard.
    Live,
}

/// Everything the host needs to render the widget at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub phase: Phase,
    pub displayed_days: u64,
    /// Count-up progress, absent when there was nothing to animate.
    pub animation: Option<AnimationState>,
    /// Time left until the match. Zero until the `Live` phase.
    pub match_clock: ClockReadout,
    pub score: Scoreboard,
}

impl Snapshot {
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.phase == Phase::Transitioning
    }
}

/// Receives widget snapshots.
pub trait SnapshotSink {
    fn publish(&mut self, snapshot: &Snapshot);
}

/// Errors that can occur during tenure widget operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TenureError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: RunState,
    },

    /// The count-up animation failed.
    Animation(AnimationError),

    /// The hold/fade sequence failed.
    Phase(PhaseError),

    /// The strike clock failed.
    Clock(ClockError),
}

impl core::fmt::Display for TenureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TenureError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but widget is in {:?}",
                    expected, actual
                )
            }
            TenureError::Animation(err) => write!(f, "count-up error: {}", err),
            TenureError::Phase(err) => write!(f, "phase error: {}", err),
            TenureError::Clock(err) => write!(f, "clock error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TenureError {}

impl From<AnimationError> for TenureError {
    fn from(err: AnimationError) -> Self {
        TenureError::Animation(err)
    }
}

impl From<PhaseError> for TenureError {
    fn from(err: PhaseError) -> Self {
        TenureError::Phase(err)
    }
}

impl From<ClockError> for TenureError {
    fn from(err: ClockError) -> Self {
        TenureError::Clock(err)
    }
}

#[derive(Default)]
struct CountUpCapture {
    displayed: Option<u64>,
    completed: bool,
}

impl CountUpSink for CountUpCapture {
    fn on_step(&mut self, displayed: u64) {
        self.displayed = Some(displayed);
    }

    fn on_complete(&mut self) {
        self.completed = true;
    }
}

struct PhaseTracker {
    phase: Phase,
}

impl PhaseObserver<Phase> for PhaseTracker {
    fn on_enter(&mut self, label: &Phase) {
        self.phase = self.phase.max(*label);
    }

    fn on_exit(&mut self, label: &Phase) {
        if *label == Phase::Transitioning {
            self.phase = Phase::Live;
        }
    }
}

#[derive(Default)]
struct ReadoutCapture(Option<Breakdown>);

impl BreakdownSink for ReadoutCapture {
    fn publish(&mut self, breakdown: Breakdown) {
        self.0 = Some(breakdown);
    }
}

/// Hold, then fade.
type TransitionRunner<'t, T> = PhaseRunner<'t, Timestamp, T, Phase, 2>;

/// Days-survived counter that hands over to a match strike clock.
pub struct TenureClock<'t, T: TimeSource<Timestamp>> {
    time_source: &'t T,
    config: TenureConfig,
    state: RunState,
    phase: Phase,
    displayed_days: u64,
    count_up: Option<CountUp<'t, Timestamp, T>>,
    transition: Option<TransitionRunner<'t, T>>,
    strike_clock: LiveClock<'t, T>,
    match_clock: ClockReadout,
    score: Scoreboard,
    last_published: Option<Snapshot>,
}

impl<'t, T: TimeSource<Timestamp>> TenureClock<'t, T> {
    /// Mounts the widget, computing survival days from the configured start.
    ///
    /// A missing start, a start in the future, or less than one whole day all
    /// give zero days. Zero days are shown directly without animation, and the
    /// widget then stays in [`Phase::Accumulating`].
    pub fn mount(time_source: &'t T, config: TenureConfig) -> Self {
        let now = time_source.now();
        let survival_days = config
            .start
            .map(|start| compute_breakdown(start, now, Mode::Elapsed).days)
            .unwrap_or(0);

        let count_up = match CountUp::new(time_source, survival_days, config.preset) {
            Ok(count_up) => Some(count_up),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("tenure count-up skipped: {}", _err);
                None
            }
        };

        Self {
            time_source,
            config,
            state: RunState::Ready,
            phase: Phase::Accumulating,
            displayed_days: if count_up.is_some() { 0 } else { survival_days },
            count_up,
            transition: None,
            strike_clock: LiveClock::new(time_source, config.match_date, Mode::Countdown),
            match_clock: ClockReadout::ZERO,
            score: Scoreboard::new(),
            last_published: None,
        }
    }

    /// Starts the widget and publishes the first snapshot.
    ///
    /// Must be called from `Ready` state.
    pub fn start<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ServiceTiming<Millis>, TenureError> {
        if self.state != RunState::Ready {
            return Err(TenureError::InvalidState {
                expected: "Ready",
                actual: self.state,
            });
        }

        self.state = RunState::Running;
        let timing = match self.count_up.as_mut() {
            Some(count_up) => count_up.start()?,
            None => ServiceTiming::Complete,
        };
        self.publish_if_changed(sink);
        Ok(timing)
    }

    /// Services every active timer and publishes a snapshot if anything changed.
    ///
    /// Must be called from `Running` state. A very late call may pass through
    /// several phases at once; only the final state is published.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Delay(d))` - Soonest pending timer fires after `d`
    /// - `Ok(ServiceTiming::Complete)` - Nothing is ticking
    /// - `Err` - Invalid state
    pub fn service<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ServiceTiming<Millis>, TenureError> {
        if self.state != RunState::Running {
            return Err(TenureError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        }

        let mut timing = ServiceTiming::Complete;

        if let Some(count_up) = self.count_up.as_mut()
            && count_up.state() == RunState::Running
        {
            let mut capture = CountUpCapture::default();
            let count_up_timing = count_up.service(&mut capture)?;
            let finished_at = count_up.scheduled_end();
            if let Some(displayed) = capture.displayed {
                self.displayed_days = displayed;
            }
            if capture.completed {
                self.begin_transition(finished_at)?;
            } else {
                timing = timing.sooner(count_up_timing);
            }
        }

        timing = timing.sooner(self.service_transition()?);
        timing = timing.sooner(self.service_strike_clock()?);

        self.publish_if_changed(sink);
        Ok(timing)
    }

    /// Starts the hold and fade from the instant the count-up was due to finish.
    fn begin_transition(&mut self, finished_at: Option<Timestamp>) -> Result<(), TenureError> {
        let sequence = PhaseSequence::builder()
            .step(Phase::Accumulating, self.config.hold)?
            .step(Phase::Transitioning, self.config.fade)?
            .build()?;

        let mut runner: TransitionRunner<'t, T> = PhaseRunner::new(self.time_source, sequence);
        let mut tracker = PhaseTracker { phase: self.phase };
        let anchor = finished_at.unwrap_or_else(|| self.time_source.now());
        runner.start_at(anchor, &mut tracker)?;
        self.transition = Some(runner);
        self.set_phase(tracker.phase);
        Ok(())
    }

    fn service_transition(&mut self) -> Result<ServiceTiming<Millis>, TenureError> {
        let Some(runner) = self.transition.as_mut() else {
            return Ok(ServiceTiming::Complete);
        };
        if runner.state() != RunState::Running {
            return Ok(ServiceTiming::Complete);
        }

        let mut tracker = PhaseTracker { phase: self.phase };
        let timing = runner.service(&mut tracker)?;
        self.set_phase(tracker.phase);
        Ok(timing)
    }

    fn service_strike_clock(&mut self) -> Result<ServiceTiming<Millis>, TenureError> {
        if self.phase != Phase::Live {
            return Ok(ServiceTiming::Complete);
        }

        let mut capture = ReadoutCapture::default();
        let timing = match self.strike_clock.state() {
            RunState::Ready => self.strike_clock.start(&mut capture)?,
            RunState::Running => self.strike_clock.service(&mut capture)?,
            RunState::Complete | RunState::Disposed => ServiceTiming::Complete,
        };
        if let Some(breakdown) = capture.0 {
            self.match_clock = breakdown.clock_readout();
        }
        Ok(timing)
    }

    fn set_phase(&mut self, phase: Phase) {
        if phase > self.phase {
            #[cfg(feature = "defmt")]
            defmt::debug!("tenure phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn publish_if_changed<S: SnapshotSink>(&mut self, sink: &mut S) {
        let snapshot = self.snapshot();
        if self.last_published != Some(snapshot) {
            sink.publish(&snapshot);
            self.last_published = Some(snapshot);
        }
    }

    /// Handles a host action, publishing the resulting snapshot.
    ///
    /// Score actions are accepted in `Ready` and `Running` states. `Dispose`
    /// is accepted in any state.
    pub fn handle_action<S: SnapshotSink>(
        &mut self,
        action: ClockAction,
        sink: &mut S,
    ) -> Result<(), TenureError> {
        if action == ClockAction::Dispose {
            self.dispose();
            return Ok(());
        }

        if self.state.is_finished() {
            return Err(TenureError::InvalidState {
                expected: "Ready or Running",
                actual: self.state,
            });
        }

        match action {
            ClockAction::AdjustScore { side, delta } => {
                self.score.adjust(side, delta);
            }
            ClockAction::ResetScore => self.score.reset(),
            ClockAction::Dispose => {}
        }
        self.publish_if_changed(sink);
        Ok(())
    }

    /// Cancels every timer. Idempotent; nothing is published afterwards.
    pub fn dispose(&mut self) {
        if self.state == RunState::Disposed {
            return;
        }
        if let Some(count_up) = self.count_up.as_mut() {
            count_up.cancel();
        }
        if let Some(runner) = self.transition.as_mut() {
            runner.cancel();
        }
        self.strike_clock.dispose();
        self.state = RunState::Disposed;
        #[cfg(feature = "defmt")]
        defmt::debug!("tenure widget disposed in {}", self.phase);
    }

    /// Builds a snapshot of the current state without publishing it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            displayed_days: self.displayed_days,
            animation: self.count_up.as_ref().map(|c| c.animation()),
            match_clock: self.match_clock,
            score: self.score,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> Scoreboard {
        self.score
    }

    pub fn config(&self) -> &TenureConfig {
        &self.config
    }
}
