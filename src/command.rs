//! Command-based control for widgets.

use crate::scoreboard::Side;

/// Host input routed into a [`TenureClock`](crate::tenure::TenureClock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockAction {
    /// Score button pressed.
    AdjustScore { side: Side, delta: i32 },
    /// Both scores back to zero.
    ResetScore,
    /// Widget unmounted.
    Dispose,
}

impl ClockAction {
    /// `+` button for a side.
    pub const fn increment(side: Side) -> Self {
        ClockAction::AdjustScore { side, delta: 1 }
    }

    /// `-` button for a side.
    pub const fn decrement(side: Side) -> Self {
        ClockAction::AdjustScore { side, delta: -1 }
    }
}
