//! Closed-form motion paths.
//!
//! Every pose is a pure function of a sprite's accumulated phase, so the
//! same phase always produces the same position, angle and scale regardless
//! of how the frames that led there were sliced.

use glam::Vec2;

/// Where an orbit is centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// A fixed canvas point
    Fixed(Vec2),
    /// The current position of another sprite, by its index in the scene
    Sprite(usize),
}

/// Elliptical path `center + radii * (cos(w * t), sin(w * t))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPath {
    /// Center of the path
    pub anchor: Anchor,
    /// Horizontal and vertical radius in pixels
    pub radii: Vec2,
    /// Angular speed in radians per second
    pub angular_speed: f32,
}

impl OrbitPath {
    /// Creates a path around `anchor`.
    #[must_use]
    pub const fn new(anchor: Anchor, radii: Vec2, angular_speed: f32) -> Self {
        Self {
            anchor,
            radii,
            angular_speed,
        }
    }

    /// Point on the path after `phase` seconds, given the resolved center.
    #[must_use]
    pub fn point_at(&self, center: Vec2, phase: f32) -> Vec2 {
        let angle = phase * self.angular_speed;
        center + self.radii * Vec2::new(angle.cos(), angle.sin())
    }
}

/// Sinusoidal size oscillation `base + amplitude * sin(t * speed)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Size at rest, in pixels
    pub base: f32,
    /// Maximum deviation from `base`
    pub amplitude: f32,
    /// Oscillation speed in radians per second
    pub speed: f32,
}

impl Pulse {
    /// Size after `phase` seconds.
    #[must_use]
    pub fn size_at(&self, phase: f32) -> f32 {
        self.base + self.amplitude * (phase * self.speed).sin()
    }
}

/// Position, rotation and scale of a sprite at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Center of the sprite in canvas pixels
    pub position: Vec2,
    /// Rotation in degrees, clockwise on screen, in `[0, 360)`
    pub angle: f32,
    /// Width and height on screen, in pixels
    pub scale: Vec2,
}

/// Complete motion description of a sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Path followed by the sprite's center
    pub path: OrbitPath,
    /// Rotation speed in degrees per second (negative spins counterclockwise)
    pub spin: f32,
    /// Optional size oscillation applied to both axes
    pub pulse: Option<Pulse>,
}

impl Motion {
    /// Motion that follows `path` without spinning or pulsing.
    #[must_use]
    pub const fn along(path: OrbitPath) -> Self {
        Self {
            path,
            spin: 0.0,
            pulse: None,
        }
    }

    /// Adds a constant spin in degrees per second.
    #[must_use]
    pub const fn with_spin(mut self, degrees_per_second: f32) -> Self {
        self.spin = degrees_per_second;
        self
    }

    /// Adds a size pulse.
    #[must_use]
    pub const fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = Some(pulse);
        self
    }

    /// Evaluates the pose after `phase` seconds around the resolved `center`.
    #[must_use]
    pub fn pose_at(&self, center: Vec2, phase: f32, base_size: Vec2) -> Pose {
        let scale = match self.pulse {
            Some(pulse) => Vec2::splat(pulse.size_at(phase)),
            None => base_size,
        };

        Pose {
            position: self.path.point_at(center, phase),
            angle: (self.spin * phase).rem_euclid(360.0),
            scale,
        }
    }
}
