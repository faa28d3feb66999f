//! Animated count-up from zero to a target value.
//!
//! Provides [`CountUp`], which raises a displayed integer from 0 to its target in
//! fixed increments at a fixed tick interval, so that the whole animation takes
//! roughly the preset's total duration. The host services it like any other
//! runnable; steps and completion are reported through a [`CountUpSink`].

use crate::time::{Millis, TimeDuration, TimeInstant, TimeSource};
use crate::types::{RunState, ServiceTiming};

/// Step divisor and total duration for a count-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountUpPreset {
    /// Target is reached in about this many increments.
    pub divisor: u64,
    /// Approximate wall time of the whole animation.
    pub total: Millis,
}

impl CountUpPreset {
    /// Forty increments over 1.5 s.
    pub const BRISK: Self = CountUpPreset {
        divisor: 40,
        total: Millis(1_500),
    };

    /// Thirty increments over 2 s.
    pub const RELAXED: Self = CountUpPreset {
        divisor: 30,
        total: Millis(2_000),
    };

    /// Creates a custom preset.
    pub const fn new(divisor: u64, total: Millis) -> Self {
        Self { divisor, total }
    }

    /// Plans the animation towards `target`.
    ///
    /// `increment = max(1, target / divisor)` and
    /// `tick_interval = total * increment / target`, never below 1 ms.
    ///
    /// # Errors
    /// * `DegenerateTarget` - `target` is zero, there is nothing to animate
    pub fn plan(&self, target: u64) -> Result<AnimationState, AnimationError> {
        if target == 0 {
            return Err(AnimationError::DegenerateTarget);
        }

        let increment = (target / self.divisor.max(1)).max(1);
        let interval = (self.total.0 as u128 * increment as u128 / target as u128).max(1);

        Ok(AnimationState {
            displayed: 0,
            target,
            increment,
            tick_interval: Millis(u64::try_from(interval).unwrap_or(u64::MAX)),
        })
    }
}

impl Default for CountUpPreset {
    fn default() -> Self {
        CountUpPreset::BRISK
    }
}

/// Progress of a count-up animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationState {
    /// Value currently shown. Never exceeds `target`.
    pub displayed: u64,
    pub target: u64,
    pub increment: u64,
    pub tick_interval: Millis,
}

impl AnimationState {
    /// Value shown after `ticks` whole tick intervals.
    #[inline]
    pub fn value_after(&self, ticks: u64) -> u64 {
        ticks.saturating_mul(self.increment).min(self.target)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.displayed >= self.target
    }

    /// Number of ticks needed to reach `target`.
    #[inline]
    pub fn ticks_to_finish(&self) -> u64 {
        self.target.div_ceil(self.increment)
    }

    /// Time from the start of the animation to the step that reaches `target`.
    #[inline]
    pub fn total_duration(&self) -> Millis {
        Millis(self.ticks_to_finish().saturating_mul(self.tick_interval.0))
    }
}

/// Receives count-up progress.
pub trait CountUpSink {
    /// Called whenever the displayed value increases.
    fn on_step(&mut self, displayed: u64);

    /// Called exactly once, right after the step that reaches the target.
    fn on_complete(&mut self);
}

/// Errors that can occur during count-up operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationError {
    /// Target is zero; show it directly instead of animating.
    DegenerateTarget,

    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: RunState,
    },
}

impl core::fmt::Display for AnimationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AnimationError::DegenerateTarget => {
                write!(f, "count-up target must be greater than zero")
            }
            AnimationError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but count-up is in {:?}",
                    expected, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AnimationError {}

/// Drives a count-up animation against a time source.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
pub struct CountUp<'t, I: TimeInstant, T: TimeSource<I>> {
    time_source: &'t T,
    animation: AnimationState,
    state: RunState,
    start_time: Option<I>,
}

impl<'t, I: TimeInstant, T: TimeSource<I>> CountUp<'t, I, T> {
    /// Creates a count-up towards `target` in `Ready` state.
    ///
    /// # Errors
    /// * `DegenerateTarget` - `target` is zero
    pub fn new(time_source: &'t T, target: u64, preset: CountUpPreset) -> Result<Self, AnimationError> {
        Ok(Self {
            time_source,
            animation: preset.plan(target)?,
            state: RunState::Ready,
            start_time: None,
        })
    }

    /// Starts ticking. The first step is due one tick interval from now.
    ///
    /// Must be called from `Ready` state.
    pub fn start(&mut self) -> Result<ServiceTiming<I::Duration>, AnimationError> {
        if self.state != RunState::Ready {
            return Err(AnimationError::InvalidState {
                expected: "Ready",
                actual: self.state,
            });
        }

        self.start_time = Some(self.time_source.now());
        self.state = RunState::Running;
        Ok(ServiceTiming::Delay(I::Duration::from_millis(
            self.animation.tick_interval.0,
        )))
    }

    /// Services the animation, reporting a step if the displayed value grew.
    ///
    /// Must be called from `Running` state. A late service jumps straight to
    /// the value of the latest elapsed tick.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Delay(d))` - Next step is due after `d`
    /// - `Ok(ServiceTiming::Complete)` - Target reached, `on_complete` has fired
    /// - `Err` - Invalid state
    pub fn service<S: CountUpSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ServiceTiming<I::Duration>, AnimationError> {
        if self.state != RunState::Running {
            return Err(AnimationError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        }

        let Some(start_time) = self.start_time else {
            return Err(AnimationError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        };

        let elapsed = self.time_source.now().duration_since(start_time).as_millis();
        let interval = self.animation.tick_interval.0;
        let ticks = elapsed / interval;
        let value = self.animation.value_after(ticks);

        if value > self.animation.displayed {
            self.animation.displayed = value;
            sink.on_step(value);
        }

        if self.animation.is_finished() {
            self.state = RunState::Complete;
            #[cfg(feature = "defmt")]
            defmt::debug!("count-up reached {=u64}", self.animation.target);
            sink.on_complete();
            return Ok(ServiceTiming::Complete);
        }

        let next_tick_at = (ticks + 1).saturating_mul(interval);
        Ok(ServiceTiming::Delay(I::Duration::from_millis(
            next_tick_at - elapsed,
        )))
    }

    /// Cancels the animation. Idempotent; no step or completion fires afterwards.
    pub fn cancel(&mut self) {
        self.state = RunState::Disposed;
        self.start_time = None;
    }

    /// Instant at which the final step is due, regardless of when it was serviced.
    ///
    /// `None` before `start` and after `cancel`.
    pub fn scheduled_end(&self) -> Option<I> {
        let start_time = self.start_time?;
        start_time.checked_add(I::Duration::from_millis(self.animation.total_duration().0))
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns a snapshot of the animation progress.
    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    /// Returns the value currently displayed.
    pub fn displayed(&self) -> u64 {
        self.animation.displayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;
    use crate::test_support::ManualClock;
    extern crate std;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        steps: Vec<u64>,
        completions: usize,
    }

    impl CountUpSink for Recorder {
        fn on_step(&mut self, displayed: u64) {
            self.steps.push(displayed);
        }

        fn on_complete(&mut self) {
            self.completions += 1;
        }
    }

    #[test]
    fn brisk_plan_for_hundred() {
        let plan = CountUpPreset::BRISK.plan(100).unwrap();
        assert_eq!(plan.increment, 2);
        assert_eq!(plan.tick_interval, Millis(30));
        assert_eq!(plan.displayed, 0);
    }

    #[test]
    fn relaxed_plan_for_hundred() {
        let plan = CountUpPreset::RELAXED.plan(100).unwrap();
        assert_eq!(plan.increment, 3);
        assert_eq!(plan.tick_interval, Millis(60));
    }

    #[test]
    fn small_targets_step_by_one() {
        let plan = CountUpPreset::BRISK.plan(15).unwrap();
        assert_eq!(plan.increment, 1);
        assert_eq!(plan.tick_interval, Millis(100));
    }

    #[test]
    fn zero_target_is_degenerate() {
        assert_eq!(
            CountUpPreset::BRISK.plan(0),
            Err(AnimationError::DegenerateTarget)
        );
        let timer = ManualClock::new();
        assert!(matches!(
            CountUp::<Timestamp, ManualClock>::new(&timer, 0, CountUpPreset::BRISK),
            Err(AnimationError::DegenerateTarget)
        ));
    }

    #[test]
    fn zero_total_duration_still_ticks() {
        let plan = CountUpPreset::new(40, Millis(0)).plan(1000).unwrap();
        assert_eq!(plan.tick_interval, Millis(1));
    }

    #[test]
    fn value_after_clamps() {
        let plan = CountUpPreset::BRISK.plan(99).unwrap();
        assert_eq!(plan.value_after(49), 98);
        assert_eq!(plan.value_after(50), 99);
        assert_eq!(plan.value_after(u64::MAX), 99);
    }

    #[test]
    fn runs_to_target_and_completes_once() {
        let timer = ManualClock::new();
        let mut count_up = CountUp::<Timestamp, ManualClock>::new(&timer, 100, CountUpPreset::BRISK).unwrap();
        let mut sink = Recorder::default();

        let mut timing = count_up.start().unwrap();
        while let ServiceTiming::Delay(delay) = timing {
            timer.advance(delay.0);
            timing = count_up.service(&mut sink).unwrap();
        }

        assert_eq!(sink.steps.len(), 50);
        assert_eq!(sink.steps.last(), Some(&100));
        assert!(sink.steps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sink.completions, 1);
        assert_eq!(count_up.state(), RunState::Complete);
        assert!(count_up.service(&mut sink).is_err());
        assert_eq!(sink.completions, 1);
    }

    #[test]
    fn service_before_first_tick_reports_nothing() {
        let timer = ManualClock::new();
        let mut count_up = CountUp::<Timestamp, ManualClock>::new(&timer, 100, CountUpPreset::BRISK).unwrap();
        let mut sink = Recorder::default();
        count_up.start().unwrap();

        timer.advance(10);
        assert_eq!(
            count_up.service(&mut sink).unwrap(),
            ServiceTiming::Delay(Millis(20))
        );
        assert!(sink.steps.is_empty());
    }

    #[test]
    fn scheduled_end_ignores_late_service() {
        let timer = ManualClock::new();
        let mut count_up = CountUp::<Timestamp, ManualClock>::new(&timer, 101, CountUpPreset::BRISK).unwrap();
        let mut sink = Recorder::default();
        assert_eq!(count_up.scheduled_end(), None);

        count_up.start().unwrap();
        // 51 ticks of 29 ms.
        let due = Timestamp::from_epoch_millis(1_479);
        assert_eq!(count_up.animation().total_duration(), Millis(1_479));
        assert_eq!(count_up.scheduled_end(), Some(due));

        timer.advance(4_000);
        assert_eq!(count_up.service(&mut sink).unwrap(), ServiceTiming::Complete);
        assert_eq!(count_up.scheduled_end(), Some(due));
    }

    #[test]
    fn cancel_stops_callbacks() {
        let timer = ManualClock::new();
        let mut count_up = CountUp::<Timestamp, ManualClock>::new(&timer, 100, CountUpPreset::BRISK).unwrap();
        let mut sink = Recorder::default();
        count_up.start().unwrap();

        timer.advance(300);
        count_up.service(&mut sink).unwrap();
        count_up.cancel();
        count_up.cancel();

        timer.advance(5_000);
        assert!(count_up.service(&mut sink).is_err());
        assert_eq!(sink.steps, [20]);
        assert_eq!(sink.completions, 0);
    }
}
