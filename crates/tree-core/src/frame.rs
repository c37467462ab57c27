//! The per-refresh frame loop and the hand-off to a renderer.

use glam::{Mat4, Vec3};
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::constants::{MAX_FRAME_DT, TOPPER_COLOR, TOPPER_SIZE};
use crate::error::{ConfigError, SceneError};
use crate::falling::{FallingField, Flake, FlakeKind};
use crate::focus::select_focus;
use crate::gesture::{GestureReader, GestureSample};
use crate::motion::{Mode, ModeRequest, MotionState};
use crate::object::{AnimatedObject, AnimationContext, ObjectId, Shape};
use crate::photo::{PhotoAsset, PhotoStore};
use crate::scene::Scene;

/// Packed per-instance data for GPU upload. Positions are in world space.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderInstance {
    pub pos: [f32; 3],
    pub scale: f32,
    pub color: [f32; 4],
    pub angle: f32,
    pub shape: u32,
    pub _pad: [u32; 2],
}

pub fn shape_code(shape: Shape) -> u32 {
    match shape {
        Shape::Cube => 0,
        Shape::Sphere => 1,
        Shape::Cane => 2,
        Shape::Tetrahedron => 3,
        Shape::Octahedron => 4,
        Shape::Frame => 5,
    }
}

/// Read-only view of everything a renderer needs for one frame.
pub struct SceneFrame<'a> {
    pub camera: &'a Camera,
    pub root: Mat4,
    pub mode: Mode,
    pub elapsed: f32,
    pub objects: &'a [AnimatedObject],
    /// Tree-top star in scene-local space.
    pub topper: Vec3,
    pub flakes: &'a [Flake],
}

impl SceneFrame<'_> {
    pub fn instance_count(&self) -> usize {
        self.objects.len() + 1 + self.flakes.len()
    }

    /// Fill `out` with one instance per object, then the topper, then one per
    /// flake. Objects collapsed to zero scale are still emitted so instance
    /// indices stay stable.
    pub fn write_instances(&self, out: &mut Vec<RenderInstance>) {
        out.clear();
        out.reserve(self.instance_count());
        for object in self.objects {
            let visual = object.visual();
            out.push(RenderInstance {
                pos: object.world_position(&self.root).to_array(),
                scale: object.transform.scale * visual.size,
                color: visual.color,
                angle: object.transform.rotation.z,
                shape: shape_code(visual.shape),
                _pad: [0; 2],
            });
        }
        out.push(RenderInstance {
            pos: self.root.transform_point3(self.topper).to_array(),
            scale: TOPPER_SIZE,
            color: TOPPER_COLOR,
            angle: 0.0,
            shape: shape_code(Shape::Octahedron),
            _pad: [0; 2],
        });
        for flake in self.flakes {
            let shape = match flake.kind {
                FlakeKind::Snow => Shape::Tetrahedron,
                FlakeKind::Star => Shape::Octahedron,
            };
            out.push(RenderInstance {
                pos: flake.position.to_array(),
                scale: flake.kind.size(),
                color: flake.kind.color(),
                angle: flake.rotation.z,
                shape: shape_code(shape),
                _pad: [0; 2],
            });
        }
    }
}

/// Something that turns a scene frame into pixels.
pub trait Renderer {
    fn render(&mut self, frame: &SceneFrame<'_>) -> anyhow::Result<()>;
}

pub struct FrameLoop {
    scene: Scene,
    motion: MotionState,
    falling: FallingField,
    camera: Camera,
    gestures: Option<GestureReader>,
    rng: StdRng,
    rotation_speed: f32,
    grab_radius: f32,
    elapsed: f32,
    last_instant: Option<Instant>,
}

impl FrameLoop {
    pub fn new(config: SceneConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scene_rng = StdRng::from_rng(&mut rng).unwrap_or_else(|_| StdRng::from_entropy());
        let falling = FallingField::new(&config, &mut rng);
        let camera = Camera::scene_default(config.camera_z, 16.0 / 9.0);
        Ok(Self {
            rotation_speed: config.rotation_speed,
            grab_radius: config.grab_radius,
            scene: Scene::with_rng(config, scene_rng),
            motion: MotionState::new(),
            falling,
            camera,
            gestures: None,
            rng,
            elapsed: 0.0,
            last_instant: None,
        })
    }

    /// Consume classifier results published by an inference worker.
    pub fn attach_gestures(&mut self, reader: GestureReader) {
        self.gestures = Some(reader);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
    pub fn motion(&self) -> &MotionState {
        &self.motion
    }
    pub fn falling(&self) -> &FallingField {
        &self.falling
    }
    pub fn falling_mut(&mut self) -> &mut FallingField {
        &mut self.falling
    }
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
    pub fn mode(&self) -> Mode {
        self.motion.mode()
    }

    /// Handle one classifier result: update the pointer and run the mode
    /// transition it implies.
    pub fn apply_gesture(&mut self, sample: GestureSample) {
        let root = self.motion.rotation.root_matrix();
        let scene = &self.scene;
        let camera = &self.camera;
        let grab_radius = self.grab_radius;
        self.motion.apply_gesture(
            &sample,
            || select_focus(scene.photo_positions(&root), camera, grab_radius),
            &mut self.rng,
        );
    }

    pub fn force_mode(&mut self, request: ModeRequest) {
        self.motion.force(request);
    }

    /// Advance the simulation by `dt` seconds without rendering.
    pub fn step(&mut self, dt: f32) {
        if let Some(sample) = self.gestures.as_mut().and_then(GestureReader::poll) {
            self.apply_gesture(sample);
        }

        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.elapsed += dt;

        self.motion.integrate_rotation(dt, self.rotation_speed);
        let ctx = AnimationContext::new(
            dt,
            self.elapsed,
            self.motion.mode(),
            self.motion.rotation,
            self.camera.eye,
        );
        self.scene.update(&ctx);
        self.falling.update(dt, self.elapsed, &mut self.rng);
    }

    pub fn frame(&self) -> SceneFrame<'_> {
        SceneFrame {
            camera: &self.camera,
            root: self.motion.rotation.root_matrix(),
            mode: self.motion.mode(),
            elapsed: self.elapsed,
            objects: self.scene.objects(),
            topper: self.scene.topper_position(),
            flakes: self.falling.flakes(),
        }
    }

    /// One display refresh: measure the frame time, step, and render.
    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> anyhow::Result<()> {
        let now = Instant::now();
        let dt = self
            .last_instant
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_instant = Some(now);
        self.step(dt);
        renderer.render(&self.frame())
    }

    // ---------------- Population changes ----------------

    pub fn rebuild_population(&mut self, tree_count: usize, dust_count: usize) {
        self.scene.rebuild(tree_count, dust_count);
    }

    pub fn rebuild_falling(&mut self, count: usize) {
        self.falling.rebuild(count, &mut self.rng);
    }

    pub fn add_photo(&mut self, asset: PhotoAsset) -> Result<ObjectId, SceneError> {
        self.scene.add_photo(asset)
    }

    pub fn import_photo(
        &mut self,
        store: &mut dyn PhotoStore,
        image: Vec<u8>,
    ) -> Result<ObjectId, SceneError> {
        self.scene.import_photo(store, image)
    }

    pub fn restore_photos(&mut self, store: &dyn PhotoStore) -> Result<usize, SceneError> {
        self.scene.restore_photos(store)
    }

    pub fn ensure_default_photo(&mut self) -> Option<ObjectId> {
        self.scene.ensure_default_photo()
    }

    pub fn remove_photo(&mut self, photo_id: &str) -> Result<ObjectId, SceneError> {
        let id = self.scene.remove_photo(photo_id)?;
        self.motion.release_focus_on(id);
        Ok(id)
    }

    pub fn delete_photo(
        &mut self,
        store: &mut dyn PhotoStore,
        photo_id: &str,
    ) -> Result<ObjectId, SceneError> {
        let id = self.scene.delete_photo(store, photo_id)?;
        self.motion.release_focus_on(id);
        Ok(id)
    }

    pub fn clear_photos(&mut self, store: &mut dyn PhotoStore) -> Result<usize, SceneError> {
        let removed = self.scene.clear_photos(store)?;
        for id in &removed {
            self.motion.release_focus_on(*id);
        }
        Ok(removed.len())
    }
}
