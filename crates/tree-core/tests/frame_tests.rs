// Host-side tests for the frame loop and the renderer hand-off.

use glam::Vec2;
use tree_core::*;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n....";

fn config() -> SceneConfig {
    SceneConfig {
        tree_count: 50,
        dust_count: 30,
        falling_count: 20,
        ..SceneConfig::default()
    }
}

fn frame_loop() -> FrameLoop {
    FrameLoop::new(config(), Some(5)).expect("valid config")
}

fn hand(signal: GestureSignal) -> GestureSample {
    GestureSample {
        hand_detected: true,
        pointer: Vec2::ZERO,
        signal,
    }
}

/// Renderer double that keeps what it was handed.
#[derive(Default)]
struct RecordingRenderer {
    frames: usize,
    last_modes: Vec<Mode>,
    last_instances: Vec<RenderInstance>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &SceneFrame<'_>) -> anyhow::Result<()> {
        self.frames += 1;
        self.last_modes.push(frame.mode);
        frame.write_instances(&mut self.last_instances);
        Ok(())
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&mut self, _frame: &SceneFrame<'_>) -> anyhow::Result<()> {
        anyhow::bail!("device lost")
    }
}

#[test]
fn invalid_config_is_rejected() {
    let bad = SceneConfig {
        grab_radius: 0.0,
        ..config()
    };
    assert!(FrameLoop::new(bad, None).is_err());
}

#[test]
fn render_instance_layout_is_packed() {
    assert_eq!(std::mem::size_of::<RenderInstance>(), 48);
}

#[test]
fn pinch_on_centred_photo_enters_focus() {
    let mut fl = frame_loop();
    let photo = fl.add_photo(PhotoAsset::new("p", PNG)).unwrap();
    fl.apply_gesture(hand(GestureSignal::Open));
    assert_eq!(fl.mode(), Mode::Dispersed);

    // photos start at the root origin, which projects to screen centre
    fl.apply_gesture(hand(GestureSignal::Pinch));
    assert_eq!(fl.motion().focus_target(), Some(photo));
    assert!(fl.motion().focus_variant().unwrap().index() < 4);

    fl.apply_gesture(hand(GestureSignal::Open));
    assert_eq!(fl.mode(), Mode::Dispersed);
    assert_eq!(fl.motion().focus_target(), None);
}

#[test]
fn pinch_without_photos_does_nothing() {
    let mut fl = frame_loop();
    fl.force_mode(ModeRequest::Disperse);
    fl.apply_gesture(hand(GestureSignal::Pinch));
    assert_eq!(fl.mode(), Mode::Dispersed);
}

#[test]
fn removing_the_focused_photo_releases_focus() {
    let mut fl = frame_loop();
    fl.add_photo(PhotoAsset::new("p", PNG)).unwrap();
    fl.apply_gesture(hand(GestureSignal::Pinch));
    assert!(fl.mode().is_focused());
    fl.remove_photo("p").unwrap();
    assert_eq!(fl.mode(), Mode::Dispersed);
    fl.step(1.0 / 60.0);
}

#[test]
fn clearing_photos_releases_focus() {
    let mut fl = frame_loop();
    let mut store = MemoryPhotoStore::new();
    fl.import_photo(&mut store, PNG.to_vec()).unwrap();
    fl.apply_gesture(hand(GestureSignal::Pinch));
    assert!(fl.mode().is_focused());
    assert_eq!(fl.clear_photos(&mut store).unwrap(), 1);
    assert_eq!(fl.mode(), Mode::Dispersed);
    assert!(fl.ensure_default_photo().is_some());
}

#[test]
fn gestures_from_the_cell_are_applied_on_step() {
    let mut fl = frame_loop();
    let cell = GestureCell::new();
    fl.attach_gestures(cell.reader());
    fl.step(0.01);
    assert_eq!(fl.mode(), Mode::Aggregated);

    cell.publish(hand(GestureSignal::Open));
    fl.step(0.01);
    assert_eq!(fl.mode(), Mode::Dispersed);

    // same sample is not applied twice
    fl.force_mode(ModeRequest::Aggregate);
    fl.step(0.01);
    assert_eq!(fl.mode(), Mode::Aggregated);
}

#[test]
fn step_clamps_long_and_negative_frames() {
    let mut fl = frame_loop();
    fl.step(10.0);
    assert!((fl.elapsed() - 0.25).abs() < 1e-6);
    fl.step(-1.0);
    assert!((fl.elapsed() - 0.25).abs() < 1e-6);
}

#[test]
fn tick_renders_every_object_and_flake() {
    let mut fl = frame_loop();
    fl.ensure_default_photo();
    let mut renderer = RecordingRenderer::default();
    for _ in 0..3 {
        fl.tick(&mut renderer).unwrap();
    }
    assert_eq!(renderer.frames, 3);
    // ornaments, dust, default photo, topper, flakes
    assert_eq!(renderer.last_instances.len(), 50 + 30 + 1 + 1 + 20);
    assert_eq!(fl.frame().instance_count(), renderer.last_instances.len());
    assert!(renderer.last_modes.iter().all(|m| *m == Mode::Aggregated));
    let frames = renderer
        .last_instances
        .iter()
        .filter(|i| i.shape == shape_code(Shape::Frame))
        .count();
    assert_eq!(frames, 1);
    assert!(renderer.last_instances.iter().all(|i| i.scale >= 0.0));
}

#[test]
fn renderer_errors_propagate() {
    let mut fl = frame_loop();
    assert!(fl.tick(&mut FailingRenderer).is_err());
}

#[test]
fn rebuilds_resize_populations() {
    let mut fl = frame_loop();
    fl.add_photo(PhotoAsset::new("p", PNG)).unwrap();
    fl.rebuild_population(10, 0);
    assert_eq!(fl.scene().non_photo_count(), 10);
    assert_eq!(fl.scene().photo_count(), 1);
    fl.rebuild_falling(5);
    assert_eq!(fl.falling().len(), 5);
    assert_eq!(fl.frame().instance_count(), 10 + 1 + 1 + 5);
}

#[test]
fn long_run_keeps_scales_non_negative() {
    let mut fl = frame_loop();
    fl.ensure_default_photo();
    let script = [
        GestureSignal::Open,
        GestureSignal::Pinch,
        GestureSignal::None,
        GestureSignal::Fist,
        GestureSignal::Open,
    ];
    for (i, signal) in script.iter().cycle().take(500).enumerate() {
        if i % 25 == 0 {
            fl.apply_gesture(hand(*signal));
        }
        fl.step(1.0 / 30.0);
        for o in fl.scene().objects() {
            assert!(o.transform.scale >= 0.0);
            assert!(o.transform.position.is_finite());
        }
        // a focus target always exists in the population
        if let Some(target) = fl.motion().focus_target() {
            assert!(fl.scene().contains(target));
        }
    }
}

#[test]
fn topper_sits_above_the_cone_and_turns_with_the_root() {
    let fl = frame_loop();
    let top = fl.scene().topper_position();
    assert_eq!(top, glam::Vec3::new(0.0, 24.0 / 2.0 + 1.2, 0.0));

    let root = Rotation {
        yaw: 0.4,
        pitch: 0.3,
    }
    .root_matrix();
    let frame = SceneFrame {
        root,
        ..fl.frame()
    };
    let mut instances = Vec::new();
    frame.write_instances(&mut instances);
    assert_eq!(instances.len(), frame.instance_count());

    let topper = instances[fl.scene().len()];
    assert_eq!(topper.shape, shape_code(Shape::Octahedron));
    let pos = glam::Vec3::from_array(topper.pos);
    assert!(pos.distance(root.transform_point3(top)) < 1e-5);
    assert!((pos.length() - top.length()).abs() < 1e-4);
    // pitch tips the star toward the viewer
    assert!(pos.z > 1.0 && pos.y < top.y);
}

#[test]
fn topper_survives_population_rebuilds() {
    let mut fl = frame_loop();
    let before = fl.scene().topper_position();
    fl.rebuild_population(0, 0);
    fl.rebuild_falling(0);
    assert_eq!(fl.scene().topper_position(), before);
    let mut instances = Vec::new();
    fl.frame().write_instances(&mut instances);
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].shape, shape_code(Shape::Octahedron));
}

#[test]
fn clear_all_leaves_no_photo_frames() {
    let mut fl = frame_loop();
    let mut store = MemoryPhotoStore::new();
    fl.add_photo(PhotoAsset::new("static_1", PNG)).unwrap();
    fl.import_photo(&mut store, PNG.to_vec()).unwrap();
    assert_eq!(fl.clear_photos(&mut store).unwrap(), 2);
    fl.step(1.0 / 60.0);

    let mut instances = Vec::new();
    fl.frame().write_instances(&mut instances);
    assert!(instances
        .iter()
        .all(|i| i.shape != shape_code(Shape::Frame)));
    assert_eq!(fl.scene().photo_count(), 0);
    assert!(store.is_empty());
}
