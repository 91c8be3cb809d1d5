//! Textured scene sprites.

use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::motion::{Motion, Pose};

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of `size` whose midpoint is `center`.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let top_left = center - size * 0.5;
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    /// Midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Width and height as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A textured, positioned, rotatable rectangle driven by a [`Motion`].
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Name used in logs
    name: String,
    /// Texture file, relative to the working directory
    texture: PathBuf,
    /// Center in canvas pixels
    position: Vec2,
    /// Rotation in degrees
    angle: f32,
    /// On-screen width and height
    scale: Vec2,
    /// Size when no pulse applies
    base_size: Vec2,
    /// Animation phase accumulator in seconds
    phase: f32,
    /// How the sprite moves
    motion: Motion,
}

impl Sprite {
    /// Creates a sprite at the canvas origin with its base size.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        texture: impl Into<PathBuf>,
        base_size: Vec2,
        motion: Motion,
    ) -> Self {
        Self {
            name: name.into(),
            texture: texture.into(),
            position: Vec2::ZERO,
            angle: 0.0,
            scale: base_size,
            base_size,
            phase: 0.0,
            motion,
        }
    }

    /// Sets the position shown before the first update.
    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Advances the phase by `dt` and re-evaluates the pose around `center`.
    pub fn advance(&mut self, dt: f32, center: Vec2) {
        self.phase += dt;
        let pose = self.motion.pose_at(center, self.phase, self.base_size);
        self.apply(pose);
    }

    fn apply(&mut self, pose: Pose) {
        self.position = pose.position;
        self.angle = pose.angle;
        self.scale = pose.scale;
    }

    /// Destination rectangle: `scale` centered on the sprite position.
    #[must_use]
    pub fn dest_rect(&self) -> Rect {
        Rect::centered(self.position, self.scale)
    }

    /// Returns the sprite's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the texture path relative to the working directory.
    #[must_use]
    pub fn texture(&self) -> &Path {
        &self.texture
    }

    /// Returns the current center position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns the current rotation in degrees.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Returns the current on-screen size.
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Returns the motion description.
    #[must_use]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Anchor, OrbitPath};

    fn circling() -> Sprite {
        let path = OrbitPath::new(Anchor::Fixed(Vec2::ZERO), Vec2::splat(10.0), 1.0);
        Sprite::new("test", "test.png", Vec2::new(40.0, 20.0), Motion::along(path))
    }

    #[test]
    fn test_rect_centered_round_trip() {
        let rect = Rect::centered(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0));
        assert_eq!(rect, Rect::new(80.0, 40.0, 40.0, 20.0));
        assert_eq!(rect.center(), Vec2::new(100.0, 50.0));
        assert_eq!(rect.size(), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_new_sprite_uses_base_size() {
        let sprite = circling().with_position(Vec2::new(5.0, 6.0));
        assert_eq!(sprite.scale(), Vec2::new(40.0, 20.0));
        assert_eq!(sprite.position(), Vec2::new(5.0, 6.0));
        assert_eq!(sprite.phase, 0.0);
    }

    #[test]
    fn test_advance_accumulates_phase() {
        let mut sprite = circling();
        sprite.advance(0.5, Vec2::ZERO);
        sprite.advance(0.25, Vec2::ZERO);
        assert!((sprite.phase - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_dest_rect_follows_position() {
        let mut sprite = circling();
        sprite.advance(0.0, Vec2::new(100.0, 100.0));
        // Phase 0 puts the center on the +x radius
        assert_eq!(sprite.dest_rect().center(), Vec2::new(110.0, 100.0));
    }
}
