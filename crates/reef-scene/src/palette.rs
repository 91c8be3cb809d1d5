//! Background colors keyed by time of day.

use std::ops::Index;

use reef_common::Rgba8;

use crate::time_of_day::TimeOfDay;

/// Lookup table from [`TimeOfDay`] to a background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgba8; TimeOfDay::COUNT],
}

impl Palette {
    /// Water colors: bright morning, pale noon, deep evening, black night.
    pub const OCEAN: Self = Self::new([
        Rgba8::BLUE,
        Rgba8::SKY_BLUE,
        Rgba8::DARK_BLUE,
        Rgba8::BLACK,
    ]);

    /// Creates a palette from colors listed in [`TimeOfDay::ALL`] order.
    #[must_use]
    pub const fn new(colors: [Rgba8; TimeOfDay::COUNT]) -> Self {
        Self { colors }
    }

    /// Returns the color for a time of day.
    #[must_use]
    pub const fn color(&self, time: TimeOfDay) -> Rgba8 {
        self.colors[time.index()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::OCEAN
    }
}

impl Index<TimeOfDay> for Palette {
    type Output = Rgba8;

    fn index(&self, time: TimeOfDay) -> &Rgba8 {
        &self.colors[time.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocean_palette() {
        let palette = Palette::OCEAN;
        assert_eq!(palette.color(TimeOfDay::Morning), Rgba8::rgb(0, 121, 241));
        assert_eq!(palette.color(TimeOfDay::Noon), Rgba8::rgb(102, 191, 255));
        assert_eq!(palette.color(TimeOfDay::Evening), Rgba8::rgb(0, 82, 172));
        assert_eq!(palette.color(TimeOfDay::Night), Rgba8::BLACK);
    }

    #[test]
    fn test_index_matches_color() {
        let palette = Palette::default();
        for time in TimeOfDay::ALL {
            assert_eq!(palette[time], palette.color(time));
        }
    }

    #[test]
    fn test_every_phase_is_distinct() {
        let palette = Palette::OCEAN;
        for (i, a) in TimeOfDay::ALL.iter().enumerate() {
            for b in &TimeOfDay::ALL[i + 1..] {
                assert_ne!(palette[*a], palette[*b]);
            }
        }
    }
}
