//! Layout geometry: the two precomputed anchors every object flows between.
//!
//! Each function consumes uniform samples from a caller-supplied RNG so tests
//! can seed it; the `_from` variants take the samples directly.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::constants::{
    CONE_HEIGHT_BIAS, CONE_MIN_RADIUS, CONE_SPIRAL_TURNS, DISPERSED_RADIUS_BASE,
    DISPERSED_RADIUS_SPAN, DUST_DISPERSED_RADIUS_BASE, DUST_DISPERSED_RADIUS_SPAN,
};

/// Point on the spiral cone.
///
/// `u_height`, `u_radius`, `u_angle` are uniform samples in `[0, 1)`. The
/// height sample is biased by `CONE_HEIGHT_BIAS` so the wide base is denser.
pub fn aggregated_target_from(
    u_height: f32,
    u_radius: f32,
    u_angle: f32,
    height: f32,
    radius: f32,
) -> Vec3 {
    let t = u_height.powf(CONE_HEIGHT_BIAS);
    let y = t * height - height / 2.0;
    let r_max = (radius * (1.0 - t)).max(CONE_MIN_RADIUS);
    let angle = t * CONE_SPIRAL_TURNS * PI + u_angle * PI;
    let r = r_max * (0.8 + 0.4 * u_radius);
    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

pub fn aggregated_target<R: Rng + ?Sized>(rng: &mut R, height: f32, radius: f32) -> Vec3 {
    let u_height = rng.gen::<f32>();
    let u_angle = rng.gen::<f32>();
    let u_radius = rng.gen::<f32>();
    aggregated_target_from(u_height, u_radius, u_angle, height, radius)
}

/// Point on a sphere of radius `base + span * u_radius`, uniform over the
/// surface for uniform `u_theta`, `u_phi`.
pub fn dispersed_target_from(u_radius: f32, u_theta: f32, u_phi: f32, dust: bool) -> Vec3 {
    let r = if dust {
        DUST_DISPERSED_RADIUS_BASE + DUST_DISPERSED_RADIUS_SPAN * u_radius
    } else {
        DISPERSED_RADIUS_BASE + DISPERSED_RADIUS_SPAN * u_radius
    };
    let theta = u_theta * TAU;
    let phi = (2.0 * u_phi - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

pub fn dispersed_target<R: Rng + ?Sized>(rng: &mut R, dust: bool) -> Vec3 {
    let u_radius = rng.gen::<f32>();
    let u_theta = rng.gen::<f32>();
    let u_phi = rng.gen::<f32>();
    dispersed_target_from(u_radius, u_theta, u_phi, dust)
}

/// Radius bounds of the dispersed shell, `(min, max)`.
pub fn dispersed_radius_range(dust: bool) -> (f32, f32) {
    if dust {
        (
            DUST_DISPERSED_RADIUS_BASE,
            DUST_DISPERSED_RADIUS_BASE + DUST_DISPERSED_RADIUS_SPAN,
        )
    } else {
        (
            DISPERSED_RADIUS_BASE,
            DISPERSED_RADIUS_BASE + DISPERSED_RADIUS_SPAN,
        )
    }
}
