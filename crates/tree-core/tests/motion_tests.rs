// Host-side tests for the mode state machine and scene rotation.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_core::*;

fn sample(signal: GestureSignal, pointer: Vec2) -> GestureSample {
    GestureSample {
        hand_detected: true,
        pointer,
        signal,
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(3)
}

#[test]
fn starts_aggregated_without_target() {
    let m = MotionState::new();
    assert_eq!(m.mode(), Mode::Aggregated);
    assert_eq!(m.focus_target(), None);
    assert_eq!(m.rotation, Rotation::default());
}

#[test]
fn open_and_fist_switch_layouts() {
    let mut m = MotionState::new();
    let mut rng = rng();
    m.apply_gesture(&sample(GestureSignal::Open, Vec2::ZERO), || None, &mut rng);
    assert_eq!(m.mode(), Mode::Dispersed);
    m.apply_gesture(&sample(GestureSignal::Fist, Vec2::ZERO), || None, &mut rng);
    assert_eq!(m.mode(), Mode::Aggregated);
}

#[test]
fn pinch_focuses_the_picked_object() {
    let mut m = MotionState::new();
    m.force(ModeRequest::Disperse);
    let mut rng = rng();
    m.apply_gesture(
        &sample(GestureSignal::Pinch, Vec2::ZERO),
        || Some(ObjectId(42)),
        &mut rng,
    );
    assert_eq!(m.focus_target(), Some(ObjectId(42)));
    let variant = m.focus_variant().expect("variant");
    assert!(variant.index() < 4);
    assert!(m.mode().is_focused());
}

#[test]
fn pinch_with_nothing_in_range_changes_nothing() {
    let mut m = MotionState::new();
    m.force(ModeRequest::Disperse);
    let mut rng = rng();
    m.apply_gesture(&sample(GestureSignal::Pinch, Vec2::ZERO), || None, &mut rng);
    assert_eq!(m.mode(), Mode::Dispersed);
    assert_eq!(m.focus_target(), None);
}

#[test]
fn pinch_while_focused_does_not_repick() {
    let mut m = MotionState::new();
    let variant = FocusVariant::new(2).unwrap();
    m.enter_focus(ObjectId(1), variant);
    let mut picked = false;
    m.apply_gesture(
        &sample(GestureSignal::Pinch, Vec2::ZERO),
        || {
            picked = true;
            Some(ObjectId(2))
        },
        &mut rng(),
    );
    assert!(!picked);
    assert_eq!(
        m.mode(),
        Mode::Focused {
            target: ObjectId(1),
            variant
        }
    );
}

#[test]
fn open_palm_leaves_focus_and_clears_target() {
    let mut m = MotionState::new();
    m.enter_focus(ObjectId(5), FocusVariant::new(0).unwrap());
    let mut rng = rng();
    m.apply_gesture(&sample(GestureSignal::Open, Vec2::ZERO), || None, &mut rng);
    assert_eq!(m.mode(), Mode::Dispersed);
    assert_eq!(m.focus_target(), None);
}

#[test]
fn fist_leaves_focus_for_the_tree() {
    let mut m = MotionState::new();
    m.enter_focus(ObjectId(5), FocusVariant::new(3).unwrap());
    m.apply_gesture(&sample(GestureSignal::Fist, Vec2::ZERO), || None, &mut rng());
    assert_eq!(m.mode(), Mode::Aggregated);
    assert_eq!(m.focus_target(), None);
}

#[test]
fn neutral_hand_only_moves_the_pointer() {
    let mut m = MotionState::new();
    m.force(ModeRequest::Disperse);
    let p = Vec2::new(0.6, -0.2);
    m.apply_gesture(&sample(GestureSignal::None, p), || None, &mut rng());
    assert_eq!(m.mode(), Mode::Dispersed);
    assert!(m.pointer_active);
    assert_eq!(m.pointer, p);
}

#[test]
fn losing_the_hand_keeps_mode_and_deactivates_pointer() {
    let mut m = MotionState::new();
    m.enter_focus(ObjectId(9), FocusVariant::new(1).unwrap());
    m.pointer = Vec2::new(0.5, 0.5);
    m.apply_gesture(&GestureSample::NO_HAND, || None, &mut rng());
    assert!(m.mode().is_focused());
    assert!(!m.pointer_active);
    assert_eq!(m.pointer, Vec2::new(0.5, 0.5));
}

#[test]
fn forced_mode_clears_focus() {
    let mut m = MotionState::new();
    m.enter_focus(ObjectId(1), FocusVariant::new(0).unwrap());
    m.force(ModeRequest::Aggregate);
    assert_eq!(m.mode(), Mode::Aggregated);
    m.force(ModeRequest::Disperse);
    assert_eq!(m.mode(), Mode::Dispersed);
}

#[test]
fn releasing_a_removed_target() {
    let mut m = MotionState::new();
    m.enter_focus(ObjectId(1), FocusVariant::new(0).unwrap());
    m.release_focus_on(ObjectId(2));
    assert!(m.mode().is_focused());
    m.release_focus_on(ObjectId(1));
    assert_eq!(m.mode(), Mode::Dispersed);
}

#[test]
fn focus_variant_tables() {
    assert!(FocusVariant::new(4).is_none());
    let scales: Vec<f32> = (0..4).map(|i| FocusVariant::new(i).unwrap().scale()).collect();
    assert_eq!(scales, [3.0, 3.0, 3.5, 4.8]);
    assert_eq!(FocusVariant::new(3).unwrap().offset().z, 30.0);
    assert_eq!(FocusVariant::new(0).unwrap().tilt(), glam::Quat::IDENTITY);
}

#[test]
fn random_variants_cover_all_four() {
    let mut rng = rng();
    let mut seen = [false; 4];
    for _ in 0..200 {
        seen[FocusVariant::random(&mut rng).index()] = true;
    }
    assert_eq!(seen, [true; 4]);
}

// ---------------- Rotation ----------------

#[test]
fn aggregated_auto_rotates_and_levels_pitch() {
    let mut m = MotionState::new();
    m.rotation.pitch = 0.8;
    for _ in 0..60 {
        m.integrate_rotation(1.0 / 60.0, 1.4);
    }
    assert!((m.rotation.yaw - 0.3).abs() < 1e-4);
    assert!(m.rotation.pitch.abs() < 0.8 * 0.2);
}

#[test]
fn dispersed_pointer_inside_dead_zone_holds_still() {
    let mut m = MotionState::new();
    m.force(ModeRequest::Disperse);
    m.pointer_active = true;
    m.pointer = Vec2::new(0.25, -0.29);
    m.integrate_rotation(0.5, 1.4);
    assert_eq!(m.rotation, Rotation::default());
}

#[test]
fn dispersed_pointer_steers_outside_dead_zone() {
    let mut m = MotionState::new();
    m.force(ModeRequest::Disperse);
    m.pointer_active = true;
    m.pointer = Vec2::new(0.8, -0.8);
    m.integrate_rotation(0.1, 1.0);
    // yaw turns opposite the pointer, pitch follows an upward pointer
    assert!((m.rotation.yaw + 0.05).abs() < 1e-6);
    assert!((m.rotation.pitch - 0.05).abs() < 1e-6);

    m.pointer = Vec2::new(-0.8, 0.8);
    m.integrate_rotation(0.1, 1.0);
    assert!(m.rotation.yaw.abs() < 1e-6);
    assert!(m.rotation.pitch.abs() < 1e-6);
}

#[test]
fn idle_drift_without_hand() {
    let mut m = MotionState::new();
    m.force(ModeRequest::Disperse);
    m.integrate_rotation(2.0, 1.4);
    assert!((m.rotation.yaw - 0.2).abs() < 1e-6);

    let mut f = MotionState::new();
    f.enter_focus(ObjectId(0), FocusVariant::new(0).unwrap());
    f.pointer_active = true;
    f.pointer = Vec2::new(1.0, 1.0);
    f.integrate_rotation(1.0, 1.4);
    assert!((f.rotation.yaw - 0.1).abs() < 1e-6);
    assert_eq!(f.rotation.pitch, 0.0);
}
