//! Ambient snow and stars falling in world space.
//!
//! Independent of the mode state machine and of the scene rotation; it only
//! shares the frame clock. Flakes that drop below the floor are moved back to
//! the top, so the population never changes size during a session.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

use crate::config::SceneConfig;
use crate::constants::{
    FALL_PHASE_MAX, FALL_SPAWN_X_FACTOR, FALL_SPIN_X, FALL_SPIN_Z, FALL_WOBBLE_AMP_MAX,
    FALL_WOBBLE_SPEED_MAX, STAR_FRACTION,
};
use crate::object::wrap_angle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlakeKind {
    Snow,
    Star,
}

impl FlakeKind {
    pub fn color(self) -> [f32; 4] {
        match self {
            FlakeKind::Snow => [1.0, 1.0, 1.0, 0.8],
            FlakeKind::Star => [1.0, 0.867, 0.533, 1.0],
        }
    }

    pub fn size(self) -> f32 {
        match self {
            FlakeKind::Snow => 0.24,
            FlakeKind::Star => 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallBounds {
    pub range_x: f32,
    pub range_z: f32,
    pub top_y: f32,
    pub bottom_y: f32,
}

impl FallBounds {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            range_x: config.falling_range_x,
            range_z: config.falling_range_z,
            top_y: config.falling_top_y,
            bottom_y: config.falling_bottom_y,
        }
    }

    /// Half-width of the spawn band on X.
    pub fn half_x(&self) -> f32 {
        self.range_x * FALL_SPAWN_X_FACTOR / 2.0
    }

    pub fn half_z(&self) -> f32 {
        self.range_z / 2.0
    }

    fn spawn_xz<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32) {
        let x = (rng.gen::<f32>() - 0.5) * self.range_x * FALL_SPAWN_X_FACTOR;
        let z = (rng.gen::<f32>() - 0.5) * self.range_z;
        (x, z)
    }
}

#[derive(Clone, Debug)]
pub struct Flake {
    pub kind: FlakeKind,
    pub position: Vec3,
    pub rotation: Vec3,
    pub fall_speed: f32,
    pub wobble_speed: f32,
    pub wobble_amp: f32,
    pub phase: f32,
}

impl Flake {
    fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: &FallBounds, speed: f32) -> Self {
        let kind = if rng.gen::<f32>() < STAR_FRACTION {
            FlakeKind::Star
        } else {
            FlakeKind::Snow
        };
        let (x, z) = bounds.spawn_xz(rng);
        let y = bounds.bottom_y + rng.gen::<f32>() * (bounds.top_y - bounds.bottom_y);
        Self {
            kind,
            position: Vec3::new(x, y, z),
            rotation: Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, 0.0),
            fall_speed: (0.5 + rng.gen::<f32>() * 0.5) * speed,
            wobble_speed: rng.gen::<f32>() * FALL_WOBBLE_SPEED_MAX,
            wobble_amp: rng.gen::<f32>() * FALL_WOBBLE_AMP_MAX,
            phase: rng.gen::<f32>() * FALL_PHASE_MAX,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FallingField {
    bounds: FallBounds,
    speed: f32,
    flakes: Vec<Flake>,
}

impl FallingField {
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let mut field = Self {
            bounds: FallBounds::from_config(config),
            speed: config.falling_speed,
            flakes: Vec::new(),
        };
        field.rebuild(config.falling_count, rng);
        field
    }

    /// Replace the whole stream with `count` fresh flakes.
    pub fn rebuild<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.flakes.clear();
        self.flakes
            .extend((0..count).map(|_| Flake::spawn(rng, &self.bounds, self.speed)));
    }

    pub fn bounds(&self) -> &FallBounds {
        &self.bounds
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    pub fn flakes_mut(&mut self) -> &mut [Flake] {
        &mut self.flakes
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, elapsed: f32, rng: &mut R) {
        let dt = dt.max(0.0);
        let bounds = self.bounds;
        for flake in &mut self.flakes {
            flake.position.y -= flake.fall_speed * dt;
            flake.position.x +=
                (elapsed * flake.wobble_speed + flake.phase).sin() * flake.wobble_amp * dt;
            flake.rotation.x = wrap_angle(flake.rotation.x + FALL_SPIN_X * dt);
            flake.rotation.z = wrap_angle(flake.rotation.z + FALL_SPIN_Z * dt);

            if flake.position.y < bounds.bottom_y {
                let (x, z) = bounds.spawn_xz(rng);
                flake.position = Vec3::new(x, bounds.top_y, z);
            }
        }
    }
}
