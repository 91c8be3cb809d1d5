//! The reef scene: three sprites over a cycling background.

use glam::Vec2;
use reef_common::{Rgba8, SceneError};
use tracing::debug;

use crate::motion::{Anchor, Motion, OrbitPath, Pulse};
use crate::palette::Palette;
use crate::sprite::Sprite;
use crate::time_of_day::{DayCycle, TimeOfDay};

/// Canvas width in pixels.
pub const CANVAS_WIDTH: f32 = 1280.0;
/// Canvas height in pixels.
pub const CANVAS_HEIGHT: f32 = 720.0;
/// Center of the canvas.
pub const CANVAS_ORIGIN: Vec2 = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);

/// Base edge length of a sprite in pixels.
pub const OBJECT_SIZE: f32 = 200.0;
/// Distance from the jellyfish to the sea turtle.
pub const ORBIT_RADIUS: f32 = 200.0;
/// Jellyfish orbit speed in radians per second.
pub const ORBIT_SPEED: f32 = 1.5;
/// Jellyfish spin in degrees per second.
pub const ROTATION_SPEED: f32 = 120.0;
/// Pufferfish size deviation in pixels.
pub const MAX_AMPLITUDE: f32 = 20.0;
/// Pufferfish pulse speed in radians per second.
pub const PULSE_SPEED: f32 = 2.0;

/// Index of the sea turtle in [`Scene::sprites`].
pub const SEA_TURTLE: usize = 0;
/// Index of the jellyfish in [`Scene::sprites`].
pub const JELLYFISH: usize = 1;
/// Index of the pufferfish in [`Scene::sprites`].
pub const PUFFERFISH: usize = 2;

/// Scene state advanced once per frame.
///
/// Sprites are evaluated in order, so a sprite orbiting another sees the
/// anchor's position from the same frame.
#[derive(Debug, Clone)]
pub struct Scene {
    sprites: Vec<Sprite>,
    day: DayCycle,
    palette: Palette,
}

impl Scene {
    /// Creates a scene, checking that every relative orbit refers to an
    /// earlier sprite.
    pub fn new(sprites: Vec<Sprite>, day: DayCycle, palette: Palette) -> Result<Self, SceneError> {
        for (index, sprite) in sprites.iter().enumerate() {
            if let Anchor::Sprite(anchor) = sprite.motion().path.anchor {
                if anchor >= index {
                    return Err(SceneError::AnchorOutOfOrder {
                        sprite: index,
                        anchor,
                    });
                }
            }
        }

        Ok(Self {
            sprites,
            day,
            palette,
        })
    }

    /// Builds the sea turtle, jellyfish and pufferfish scene.
    pub fn reef() -> Result<Self, SceneError> {
        let scene = Self::new(reef_sprites(), DayCycle::default(), Palette::OCEAN)?;
        debug!("Built reef scene with {} sprites", scene.sprites.len());
        Ok(scene)
    }

    /// Advances every sprite and the day cycle by `dt` seconds.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        for index in 0..self.sprites.len() {
            let center = match self.sprites[index].motion().path.anchor {
                Anchor::Fixed(point) => point,
                Anchor::Sprite(anchor) => self.sprites[anchor].position(),
            };
            self.sprites[index].advance(dt, center);
        }

        self.day.advance(dt);
    }

    /// Returns the sprites in draw order.
    #[must_use]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Returns the current time of day.
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        self.day.current()
    }

    /// Background color for the current time of day.
    #[must_use]
    pub fn background(&self) -> Rgba8 {
        self.palette[self.day.current()]
    }
}

fn reef_sprites() -> Vec<Sprite> {
    // Diagonal oval right of center
    let sea_turtle = Sprite::new(
        "sea turtle",
        "assets/seaturtle.png",
        Vec2::splat(OBJECT_SIZE),
        Motion::along(OrbitPath::new(
            Anchor::Fixed(CANVAS_ORIGIN + Vec2::new(200.0, 0.0)),
            Vec2::new(100.0, 50.0),
            0.8,
        )),
    )
    .with_position(CANVAS_ORIGIN);

    // Circles the turtle while spinning counterclockwise
    let jellyfish = Sprite::new(
        "jellyfish",
        "assets/jellyfish.png",
        Vec2::splat(OBJECT_SIZE * 0.6),
        Motion::along(OrbitPath::new(
            Anchor::Sprite(SEA_TURTLE),
            Vec2::splat(ORBIT_RADIUS),
            ORBIT_SPEED,
        ))
        .with_spin(-ROTATION_SPEED),
    );

    let pufferfish = Sprite::new(
        "pufferfish",
        "assets/pufferfish.png",
        Vec2::splat(OBJECT_SIZE * 0.5),
        Motion::along(OrbitPath::new(
            Anchor::Fixed(Vec2::new(CANVAS_WIDTH * 0.25, CANVAS_HEIGHT * 0.5)),
            Vec2::splat(150.0),
            0.4,
        ))
        .with_pulse(Pulse {
            base: OBJECT_SIZE * 0.5,
            amplitude: MAX_AMPLITUDE,
            speed: PULSE_SPEED,
        }),
    )
    .with_position(Vec2::new(CANVAS_WIDTH * 0.75, CANVAS_HEIGHT * 0.25));

    vec![sea_turtle, jellyfish, pufferfish]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POSITION_TOLERANCE: f32 = 0.1;

    fn angle_distance(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    fn reef() -> Scene {
        Scene::reef().expect("reef scene is well ordered")
    }

    fn sprite(scene: &Scene, index: usize) -> &Sprite {
        &scene.sprites()[index]
    }

    #[test]
    fn test_reef_scene_layout() {
        let scene = reef();
        assert_eq!(scene.sprites().len(), 3);
        assert_eq!(sprite(&scene, SEA_TURTLE).position(), CANVAS_ORIGIN);
        assert_eq!(sprite(&scene, JELLYFISH).position(), Vec2::ZERO);
        assert_eq!(sprite(&scene, PUFFERFISH).position(), Vec2::new(960.0, 180.0));
        assert_eq!(sprite(&scene, JELLYFISH).scale(), Vec2::splat(120.0));
        assert_eq!(scene.time_of_day(), TimeOfDay::Morning);
        assert_eq!(scene.background(), Rgba8::BLUE);
    }

    #[test]
    fn test_reef_scene_passes_validation() {
        let scene = Scene::reef().expect("reef scene should validate");
        let names: Vec<&str> = scene.sprites().iter().map(Sprite::name).collect();
        assert_eq!(names, ["sea turtle", "jellyfish", "pufferfish"]);
    }

    #[test]
    fn test_forward_anchor_rejected() {
        let mut sprites = reef().sprites().to_vec();
        sprites.swap(SEA_TURTLE, JELLYFISH);
        let err = Scene::new(sprites, DayCycle::default(), Palette::OCEAN)
            .expect_err("jellyfish now precedes its anchor");
        assert_eq!(
            err,
            SceneError::AnchorOutOfOrder {
                sprite: 0,
                anchor: 0
            }
        );
    }

    #[test]
    fn test_first_update_places_sprites_on_paths() {
        let mut scene = reef();
        scene.update(0.0);

        assert_eq!(sprite(&scene, SEA_TURTLE).position(), Vec2::new(940.0, 360.0));
        assert_eq!(sprite(&scene, JELLYFISH).position(), Vec2::new(1140.0, 360.0));
        assert_eq!(sprite(&scene, PUFFERFISH).position(), Vec2::new(470.0, 360.0));
        assert_eq!(sprite(&scene, PUFFERFISH).scale(), Vec2::splat(100.0));
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut expected = reef();
        expected.update(0.0);

        let mut scene = reef();
        scene.update(-1.0);
        scene.update(f32::NAN);
        scene.update(f32::INFINITY);

        for (a, b) in scene.sprites().iter().zip(expected.sprites()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.angle(), b.angle());
        }
        assert_eq!(scene.time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn test_long_step_advances_full_duration() {
        let mut scene = reef();
        scene.update(2.1);
        assert_eq!(scene.time_of_day(), TimeOfDay::Noon);
        assert_eq!(scene.background(), Rgba8::SKY_BLUE);

        let mut sliced = reef();
        for _ in 0..21 {
            sliced.update(0.1);
        }
        let turtle = sprite(&scene, SEA_TURTLE).position();
        let sliced_turtle = sprite(&sliced, SEA_TURTLE).position();
        assert!((turtle - sliced_turtle).length() < POSITION_TOLERANCE);
    }

    #[test]
    fn test_background_follows_time_of_day() {
        let mut scene = reef();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(scene.background());
            scene.update(2.0);
        }
        assert_eq!(
            seen,
            vec![Rgba8::BLUE, Rgba8::SKY_BLUE, Rgba8::DARK_BLUE, Rgba8::BLACK]
        );
        assert_eq!(scene.time_of_day(), TimeOfDay::Morning);
    }

    proptest! {
        #[test]
        fn prop_poses_depend_only_on_elapsed_time(total in 0.0f32..30.0, steps in 1usize..60) {
            let mut once = reef();
            once.update(total);

            let mut sliced = reef();
            let dt = total / steps as f32;
            for _ in 0..steps {
                sliced.update(dt);
            }

            for (a, b) in once.sprites().iter().zip(sliced.sprites()) {
                prop_assert!((a.position() - b.position()).length() < POSITION_TOLERANCE);
                prop_assert!((a.scale() - b.scale()).length() < POSITION_TOLERANCE);
                prop_assert!(angle_distance(a.angle(), b.angle()) < 0.1);
            }
        }

        #[test]
        fn prop_jellyfish_orbits_at_fixed_radius(t in 0.0f32..1_000.0) {
            let mut scene = reef();
            scene.update(t);
            let turtle = sprite(&scene, SEA_TURTLE).position();
            let jelly = sprite(&scene, JELLYFISH).position();
            prop_assert!((turtle.distance(jelly) - ORBIT_RADIUS).abs() < 0.05);
        }

        #[test]
        fn prop_pufferfish_pulse_stays_in_bounds(t in 0.0f32..1_000.0) {
            let mut scene = reef();
            scene.update(t);
            let scale = sprite(&scene, PUFFERFISH).scale();
            prop_assert_eq!(scale.x, scale.y);
            prop_assert!(scale.x >= 80.0 - 1e-3 && scale.x <= 120.0 + 1e-3);
        }

        #[test]
        fn prop_sea_turtle_stays_on_its_oval(t in 0.0f32..1_000.0) {
            let mut scene = reef();
            scene.update(t);
            let offset = sprite(&scene, SEA_TURTLE).position() - (CANVAS_ORIGIN + Vec2::new(200.0, 0.0));
            let normalized = (offset.x / 100.0).powi(2) + (offset.y / 50.0).powi(2);
            prop_assert!((normalized - 1.0).abs() < 1e-3);
        }
    }
}
