//! Ordered, timed phases with one-directional transitions.
//!
//! A [`PhaseSequence`] lists labelled phases and how long each lasts. A
//! [`PhaseRunner`] walks the list against a time source: it enters a phase,
//! waits its duration, exits it and enters the next, until the list is
//! exhausted. Entering and exiting are reported to a [`PhaseObserver`].

use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{RunState, ServiceTiming};
use heapless::Vec;

/// A single labelled phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep<D: TimeDuration, P> {
    /// Caller-defined label, passed back to the observer.
    pub label: P,

    /// How long the phase lasts.
    pub duration: D,
}

impl<D: TimeDuration, P> PhaseStep<D, P> {
    /// Creates a new phase step.
    #[inline]
    pub fn new(label: P, duration: D) -> Self {
        Self { label, duration }
    }
}

/// Phase sequence validation and runner errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseError {
    /// No phases provided.
    EmptySequence,

    /// Sequence capacity exceeded.
    CapacityExceeded,

    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: RunState,
    },
}

impl core::fmt::Display for PhaseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PhaseError::EmptySequence => {
                write!(f, "phase sequence must have at least one phase")
            }
            PhaseError::CapacityExceeded => {
                write!(f, "phase sequence capacity exceeded")
            }
            PhaseError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but phase runner is in {:?}",
                    expected, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PhaseError {}

/// A validated, non-empty list of timed phases.
///
/// # Type Parameters
/// * `D` - The duration type
/// * `P` - The phase label type
/// * `N` - Maximum number of phases this sequence can hold
#[derive(Debug, Clone)]
pub struct PhaseSequence<D: TimeDuration, P, const N: usize> {
    steps: Vec<PhaseStep<D, P>, N>,
}

impl<D: TimeDuration, P, const N: usize> PhaseSequence<D, P, N> {
    /// Creates a new sequence builder.
    pub fn builder() -> PhaseSequenceBuilder<D, P, N> {
        PhaseSequenceBuilder::new()
    }

    /// Sum of all phase durations.
    pub fn total_duration(&self) -> D {
        let total_millis = self
            .steps
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration.as_millis()));
        D::from_millis(total_millis)
    }

    /// Returns the number of phases.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `false`; empty sequences are rejected by the builder.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the phase at the given index.
    pub fn get(&self, index: usize) -> Option<&PhaseStep<D, P>> {
        self.steps.get(index)
    }
}

/// Builder for constructing validated phase sequences.
#[derive(Debug)]
pub struct PhaseSequenceBuilder<D: TimeDuration, P, const N: usize> {
    steps: Vec<PhaseStep<D, P>, N>,
}

impl<D: TimeDuration, P, const N: usize> PhaseSequenceBuilder<D, P, N> {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a phase.
    ///
    /// # Errors
    /// * `CapacityExceeded` - The sequence already holds `N` phases
    pub fn step(mut self, label: P, duration: D) -> Result<Self, PhaseError> {
        self.steps
            .push(PhaseStep::new(label, duration))
            .map_err(|_| PhaseError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds and validates the sequence.
    ///
    /// # Errors
    /// * `EmptySequence` - No phases were added
    pub fn build(self) -> Result<PhaseSequence<D, P, N>, PhaseError> {
        if self.steps.is_empty() {
            return Err(PhaseError::EmptySequence);
        }
        Ok(PhaseSequence { steps: self.steps })
    }
}

impl<D: TimeDuration, P, const N: usize> Default for PhaseSequenceBuilder<D, P, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives phase transitions.
pub trait PhaseObserver<P> {
    /// Called when a phase begins.
    fn on_enter(&mut self, label: &P);

    /// Called when a phase's duration has passed, before the next phase is entered.
    fn on_exit(&mut self, label: &P);
}

/// Walks a [`PhaseSequence`] against a time source.
///
/// Each phase's deadline is measured from the previous phase's scheduled end,
/// not from when the host happened to service, so late polling does not
/// stretch the sequence.
pub struct PhaseRunner<'t, I: TimeInstant, T: TimeSource<I>, P, const N: usize> {
    time_source: &'t T,
    sequence: PhaseSequence<I::Duration, P, N>,
    state: RunState,
    current: usize,
    phase_start: Option<I>,
}

impl<'t, I, T, P, const N: usize> PhaseRunner<'t, I, T, P, N>
where
    I: TimeInstant,
    T: TimeSource<I>,
{
    /// Creates a runner in `Ready` state.
    pub fn new(time_source: &'t T, sequence: PhaseSequence<I::Duration, P, N>) -> Self {
        Self {
            time_source,
            sequence,
            state: RunState::Ready,
            current: 0,
            phase_start: None,
        }
    }

    /// Enters the first phase now.
    ///
    /// Must be called from `Ready` state. Zero-length leading phases are
    /// entered and exited immediately.
    pub fn start<O: PhaseObserver<P>>(
        &mut self,
        observer: &mut O,
    ) -> Result<ServiceTiming<I::Duration>, PhaseError> {
        let now = self.time_source.now();
        self.start_at(now, observer)
    }

    /// Enters the first phase as if it had begun at `anchor`.
    ///
    /// `anchor` is normally an instant in the past, such as the scheduled end
    /// of whatever preceded the sequence. Every phase that would already have
    /// ended by now is entered and exited in this call.
    pub fn start_at<O: PhaseObserver<P>>(
        &mut self,
        anchor: I,
        observer: &mut O,
    ) -> Result<ServiceTiming<I::Duration>, PhaseError> {
        if self.state != RunState::Ready {
            return Err(PhaseError::InvalidState {
                expected: "Ready",
                actual: self.state,
            });
        }

        self.state = RunState::Running;
        self.current = 0;
        self.phase_start = Some(anchor);
        observer.on_enter(&self.sequence.steps[0].label);
        self.service(observer)
    }

    /// Services the runner, firing every transition that has come due.
    ///
    /// Must be called from `Running` state.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Delay(d))` - Current phase ends after `d`
    /// - `Ok(ServiceTiming::Complete)` - Last phase exited
    /// - `Err` - Invalid state
    pub fn service<O: PhaseObserver<P>>(
        &mut self,
        observer: &mut O,
    ) -> Result<ServiceTiming<I::Duration>, PhaseError> {
        if self.state != RunState::Running {
            return Err(PhaseError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        }

        let now = self.time_source.now();
        loop {
            let Some(phase_start) = self.phase_start else {
                return Err(PhaseError::InvalidState {
                    expected: "Running",
                    actual: self.state,
                });
            };
            let step = &self.sequence.steps[self.current];
            let elapsed = now.duration_since(phase_start);

            if elapsed.as_millis() < step.duration.as_millis() {
                return Ok(ServiceTiming::Delay(step.duration.saturating_sub(elapsed)));
            }

            observer.on_exit(&step.label);
            let phase_end = phase_start.checked_add(step.duration).unwrap_or(now);

            self.current += 1;
            if self.current >= self.sequence.len() {
                self.state = RunState::Complete;
                self.phase_start = None;
                return Ok(ServiceTiming::Complete);
            }

            self.phase_start = Some(phase_end);
            observer.on_enter(&self.sequence.steps[self.current].label);
        }
    }

    /// Cancels every pending wait. Idempotent; no observer callback fires afterwards.
    pub fn cancel(&mut self) {
        self.state = RunState::Disposed;
        self.phase_start = None;
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the label of the phase currently running.
    pub fn current_label(&self) -> Option<&P> {
        match self.state {
            RunState::Running => self.sequence.get(self.current).map(|s| &s.label),
            _ => None,
        }
    }

    /// Returns the sequence being run.
    pub fn sequence(&self) -> &PhaseSequence<I::Duration, P, N> {
        &self.sequence
    }
}
