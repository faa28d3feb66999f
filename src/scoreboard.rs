//! Two-sided score kept alongside the strike clock.

/// Which team a score change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Home,
    Away,
}

/// Home and away scores. Scores never drop below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scoreboard {
    pub home: u32,
    pub away: u32,
}

impl Scoreboard {
    pub const fn new() -> Self {
        Scoreboard { home: 0, away: 0 }
    }

    /// Adds `delta` to one side, saturating at zero. Returns the new score.
    pub fn adjust(&mut self, side: Side, delta: i32) -> u32 {
        let score = match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        };
        *score = if delta < 0 {
            score.saturating_sub(delta.unsigned_abs())
        } else {
            score.saturating_add(delta.unsigned_abs())
        };
        *score
    }

    /// Returns one side's score.
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn reset(&mut self) {
        *self = Scoreboard::new();
    }
}
