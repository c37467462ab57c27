// Host-side tests for the ambient falling field.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_core::*;

fn field(count: usize, seed: u64) -> (FallingField, StdRng) {
    let config = SceneConfig {
        falling_count: count,
        ..SceneConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let field = FallingField::new(&config, &mut rng);
    (field, rng)
}

#[test]
fn spawns_inside_bounds() {
    let (field, _) = field(2000, 1);
    assert_eq!(field.len(), 2000);
    let b = *field.bounds();
    assert_eq!(b.half_x(), 45.0);
    assert_eq!(b.half_z(), 15.0);
    for f in field.flakes() {
        assert!(f.position.y >= b.bottom_y && f.position.y <= b.top_y);
        assert!(f.position.x.abs() <= b.half_x());
        assert!(f.position.z.abs() <= b.half_z());
        assert!(f.fall_speed >= 1.25 && f.fall_speed <= 2.5);
        assert!(f.wobble_speed < 2.0 && f.wobble_amp < 0.5 && f.phase < 100.0);
    }
}

#[test]
fn roughly_thirty_percent_stars() {
    let (field, _) = field(5000, 2);
    let stars = field
        .flakes()
        .iter()
        .filter(|f| f.kind == FlakeKind::Star)
        .count();
    let fraction = stars as f32 / 5000.0;
    assert!((fraction - 0.3).abs() < 0.03, "{fraction}");
}

#[test]
fn flake_below_floor_recycles_to_top() {
    let (mut field, mut rng) = field(1, 3);
    let bottom = field.bounds().bottom_y;
    let top = field.bounds().top_y;
    {
        let f = &mut field.flakes_mut()[0];
        f.position = Vec3::new(0.0, bottom + 1e-4, 0.0);
        f.fall_speed = 1.0;
    }
    field.update(0.01, 0.0, &mut rng);
    let f = &field.flakes()[0];
    assert_eq!(f.position.y, top);
    assert!(f.position.x.abs() <= field.bounds().half_x());
}

#[test]
fn flakes_fall_and_wobble_only_sideways() {
    let (mut field, mut rng) = field(1, 4);
    {
        let f = &mut field.flakes_mut()[0];
        f.position = Vec3::new(0.0, 10.0, 3.0);
        f.fall_speed = 2.0;
        f.wobble_amp = 0.5;
        f.wobble_speed = 1.0;
        f.phase = std::f32::consts::FRAC_PI_2;
    }
    field.update(0.5, 0.0, &mut rng);
    let f = &field.flakes()[0];
    assert!((f.position.y - 9.0).abs() < 1e-5);
    assert!((f.position.x - 0.25).abs() < 1e-5);
    assert_eq!(f.position.z, 3.0);
}

#[test]
fn population_stays_bounded_over_long_runs() {
    let (mut field, mut rng) = field(500, 5);
    let b = *field.bounds();
    let mut elapsed = 0.0;
    for _ in 0..5000 {
        elapsed += 0.05;
        field.update(0.05, elapsed, &mut rng);
    }
    assert_eq!(field.len(), 500);
    // wobble drifts at most amp * dt per step, so allow the accumulated slack
    let slack = 0.5 * 0.05 * 5000.0;
    for f in field.flakes() {
        assert!(f.position.y >= b.bottom_y - 0.01 && f.position.y <= b.top_y);
        assert!(f.position.x.abs() <= b.half_x() + slack);
        assert!(f.position.z.abs() <= b.half_z());
    }
}

#[test]
fn rebuild_replaces_the_stream() {
    let (mut field, mut rng) = field(100, 6);
    field.rebuild(10, &mut rng);
    assert_eq!(field.len(), 10);
    field.rebuild(0, &mut rng);
    assert!(field.is_empty());
    field.update(1.0, 1.0, &mut rng);
}

#[test]
fn flake_already_below_floor_recycles_on_next_tick() {
    let (mut field, mut rng) = field(1, 7);
    let b = *field.bounds();
    field.flakes_mut()[0].position = Vec3::new(3.0, b.bottom_y - 1e-3, -2.0);
    field.update(1.0 / 60.0, 0.0, &mut rng);
    let f = &field.flakes()[0];
    assert_eq!(f.position.y, b.top_y);
    assert!(f.position.x.abs() <= b.half_x());
    assert!(f.position.z.abs() <= b.half_z());
}
