//! 8-bit RGBA colors.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// An sRGB-encoded color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba8 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Bright blue.
    pub const BLUE: Self = Self::rgb(0, 121, 241);
    /// Light sky blue.
    pub const SKY_BLUE: Self = Self::rgb(102, 191, 255);
    /// Deep blue.
    pub const DARK_BLUE: Self = Self::rgb(0, 82, 172);

    /// Creates a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Returns the color in linear space for use with sRGB render targets.
    ///
    /// Alpha is linear already and only normalized.
    #[must_use]
    pub fn to_linear(self) -> [f64; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            f64::from(self.a) / 255.0,
        ]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(Rgba8::BLACK.to_linear(), [0.0, 0.0, 0.0, 1.0]);
        let white = Rgba8::WHITE.to_linear();
        for channel in white {
            assert!((channel - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_darkens_midtones() {
        let [r, g, b, _] = Rgba8::SKY_BLUE.to_linear();
        assert!(r < 102.0 / 255.0);
        assert!(g < 191.0 / 255.0);
        assert!(b <= 1.0);
    }
}
