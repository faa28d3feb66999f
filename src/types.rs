//! Lifecycle and scheduling types shared by every runnable.

/// Lifecycle of a clock, animation, phase runner or widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Created but not started. Nothing has been published yet.
    Ready,
    /// Actively ticking. The host should keep servicing.
    Running,
    /// Finished on its own. No further callbacks will fire.
    Complete,
    /// Torn down by the host. Terminal; no further callbacks will fire.
    Disposed,
}

impl RunState {
    /// Returns true for states that will never tick again.
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::Complete | RunState::Disposed)
    }
}

/// Timing information returned by service operations.
///
/// Indicates when the runnable needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Nothing changes until this delay has passed. Sleep, then service again.
    Delay(D),

    /// Nothing left to do. No further servicing is needed.
    Complete,
}

impl<D: Copy + Ord> ServiceTiming<D> {
    /// Returns the delay, if any.
    #[inline]
    pub fn delay(&self) -> Option<D> {
        match self {
            ServiceTiming::Delay(delay) => Some(*delay),
            ServiceTiming::Complete => None,
        }
    }

    /// Combines two timings, keeping whichever needs servicing first.
    pub fn sooner(self, other: Self) -> Self {
        match (self, other) {
            (ServiceTiming::Delay(a), ServiceTiming::Delay(b)) => ServiceTiming::Delay(a.min(b)),
            (ServiceTiming::Delay(a), ServiceTiming::Complete)
            | (ServiceTiming::Complete, ServiceTiming::Delay(a)) => ServiceTiming::Delay(a),
            (ServiceTiming::Complete, ServiceTiming::Complete) => ServiceTiming::Complete,
        }
    }
}
