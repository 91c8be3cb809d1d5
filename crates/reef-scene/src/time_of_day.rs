//! Day cycle driving the background color.
//!
//! Time of day is cosmetic: the cycle accumulates real seconds and steps
//! through four phases of equal length, wrapping after the last one.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Seconds spent in each time-of-day phase.
pub const DAY_PHASE_SECONDS: f32 = 2.0;

/// The four phases of the day cycle, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// First phase of the cycle
    #[default]
    Morning,
    /// Second phase
    Noon,
    /// Third phase
    Evening,
    /// Last phase before wrapping to morning
    Night,
}

impl TimeOfDay {
    /// Number of phases in a full cycle.
    pub const COUNT: usize = 4;

    /// All phases in cycle order.
    pub const ALL: [Self; Self::COUNT] = [Self::Morning, Self::Noon, Self::Evening, Self::Night];

    /// Position of this phase in [`TimeOfDay::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps an unbounded phase counter onto the cycle.
    #[must_use]
    pub const fn from_phase(phase: u64) -> Self {
        Self::ALL[(phase % Self::COUNT as u64) as usize]
    }

    /// Returns a display name for the phase.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Noon => "Noon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

/// Accumulates elapsed time and derives the current [`TimeOfDay`].
#[derive(Debug, Clone, Default)]
pub struct DayCycle {
    /// Seconds accumulated since the cycle started
    elapsed: f32,
    /// Phase derived on the last advance
    current: TimeOfDay,
}

impl DayCycle {
    /// Advances the cycle by `dt` seconds.
    ///
    /// Returns `true` when the time of day changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;

        let next = TimeOfDay::from_phase(self.phase_count());
        if next == self.current {
            return false;
        }

        debug!(
            "Time of day: {} -> {}",
            self.current.display_name(),
            next.display_name()
        );
        self.current = next;
        true
    }

    /// Returns the current time of day.
    #[must_use]
    pub fn current(&self) -> TimeOfDay {
        self.current
    }

    /// Number of whole phases elapsed since the cycle started.
    #[must_use]
    pub fn phase_count(&self) -> u64 {
        (self.elapsed / DAY_PHASE_SECONDS) as u64
    }
}
