//! Animated objects and their per-frame update rule.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::constants::{
    AGGREGATED_SPIN_RATE, DUST_PULSE_FREQ, FOCUS_LERP_RATE, LERP_RATE, MIN_DIRECTION_LEN,
    ORNAMENT_SPIN_MULTIPLIER, PHOTO_BASE_SCALE, PHOTO_DISPERSED_SCALE, PHOTO_SPIN_MULTIPLIER,
    SCALE_LERP_RATE, TILT_EASE_RATE, UNFOCUSED_SCALE,
};
use crate::layout::{aggregated_target, dispersed_target};
use crate::motion::{FocusVariant, Mode, Rotation};
use crate::photo::PhotoAsset;

/// Stable handle to one object in the population. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Cube,
    Sphere,
    Cane,
    Tetrahedron,
    Octahedron,
    Frame,
}

/// Geometry and colour chosen once when an object is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub shape: Shape,
    pub color: [f32; 4],
    /// Unscaled extent of the geometry in world units.
    pub size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    GreenBox,
    GoldBox,
    GoldSphere,
    RedSphere,
    CandyCane,
    Dust,
    PhotoFrame,
}

impl ObjectKind {
    /// Ornament mix for the tree population from one uniform sample.
    pub fn from_ornament_sample(u: f32) -> Self {
        if u < 0.40 {
            ObjectKind::GreenBox
        } else if u < 0.70 {
            ObjectKind::GoldBox
        } else if u < 0.92 {
            ObjectKind::GoldSphere
        } else if u < 0.97 {
            ObjectKind::RedSphere
        } else {
            ObjectKind::CandyCane
        }
    }

    pub fn is_dust(self) -> bool {
        self == ObjectKind::Dust
    }

    pub fn is_photo(self) -> bool {
        self == ObjectKind::PhotoFrame
    }

    pub fn spin_multiplier(self) -> f32 {
        if self.is_photo() {
            PHOTO_SPIN_MULTIPLIER
        } else {
            ORNAMENT_SPIN_MULTIPLIER
        }
    }

    pub fn visual(self) -> Visual {
        const CHAMPAGNE_GOLD: [f32; 4] = [1.0, 0.851, 0.4, 1.0];
        const DEEP_GREEN: [f32; 4] = [0.012, 0.094, 0.039, 1.0];
        const ACCENT_RED: [f32; 4] = [0.6, 0.0, 0.0, 1.0];
        match self {
            ObjectKind::GreenBox => Visual {
                shape: Shape::Cube,
                color: DEEP_GREEN,
                size: 0.55,
            },
            ObjectKind::GoldBox => Visual {
                shape: Shape::Cube,
                color: CHAMPAGNE_GOLD,
                size: 0.55,
            },
            ObjectKind::GoldSphere => Visual {
                shape: Shape::Sphere,
                color: CHAMPAGNE_GOLD,
                size: 1.0,
            },
            ObjectKind::RedSphere => Visual {
                shape: Shape::Sphere,
                color: ACCENT_RED,
                size: 1.0,
            },
            ObjectKind::CandyCane => Visual {
                shape: Shape::Cane,
                color: [0.95, 0.95, 0.95, 1.0],
                size: 1.0,
            },
            ObjectKind::Dust => Visual {
                shape: Shape::Tetrahedron,
                color: [1.0, 0.933, 0.733, 0.8],
                size: 0.16,
            },
            ObjectKind::PhotoFrame => Visual {
                shape: Shape::Frame,
                color: CHAMPAGNE_GOLD,
                size: 1.4,
            },
        }
    }
}

/// Position, Euler rotation (XYZ order, radians) and uniform scale, all
/// relative to the scene root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.quat(), self.position)
    }
}

/// Everything the per-object update reads besides the object itself.
#[derive(Clone, Copy, Debug)]
pub struct AnimationContext {
    pub dt: f32,
    pub elapsed: f32,
    pub mode: Mode,
    pub root: Mat4,
    pub root_inverse: Mat4,
    pub root_rotation: Quat,
    pub camera_eye: Vec3,
}

impl AnimationContext {
    pub fn new(dt: f32, elapsed: f32, mode: Mode, rotation: Rotation, camera_eye: Vec3) -> Self {
        let root = rotation.root_matrix();
        Self {
            dt,
            elapsed,
            mode,
            root,
            root_inverse: root.inverse(),
            root_rotation: Quat::from_euler(EulerRot::XYZ, rotation.pitch, rotation.yaw, 0.0),
            camera_eye,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnimatedObject {
    id: ObjectId,
    kind: ObjectKind,
    visual: Visual,
    base_scale: f32,
    aggregated_target: Vec3,
    dispersed_target: Vec3,
    spin: Vec3,
    pulse_phase: f32,
    photo: Option<PhotoAsset>,
    pub transform: Transform,
}

impl AnimatedObject {
    pub fn new<R: Rng + ?Sized>(
        id: ObjectId,
        kind: ObjectKind,
        base_scale: f32,
        tree_height: f32,
        tree_radius: f32,
        rng: &mut R,
    ) -> Self {
        let m = kind.spin_multiplier();
        let spin = Vec3::new(
            (rng.gen::<f32>() - 0.5) * m,
            (rng.gen::<f32>() - 0.5) * m,
            (rng.gen::<f32>() - 0.5) * m,
        );
        let aggregated_target = aggregated_target(rng, tree_height, tree_radius);
        let dispersed_target = dispersed_target(rng, kind.is_dust());
        let rotation = if kind.is_photo() {
            Vec3::ZERO
        } else {
            Vec3::new(
                rng.gen::<f32>() * 6.0,
                rng.gen::<f32>() * 6.0,
                rng.gen::<f32>() * 6.0,
            )
        };
        Self {
            id,
            kind,
            visual: kind.visual(),
            base_scale,
            aggregated_target,
            dispersed_target,
            spin,
            pulse_phase: rng.gen::<f32>() * TAU,
            photo: None,
            transform: Transform {
                position: Vec3::ZERO,
                rotation,
                scale: base_scale,
            },
        }
    }

    pub fn photo<R: Rng + ?Sized>(
        id: ObjectId,
        asset: PhotoAsset,
        tree_height: f32,
        tree_radius: f32,
        rng: &mut R,
    ) -> Self {
        let mut object = Self::new(
            id,
            ObjectKind::PhotoFrame,
            PHOTO_BASE_SCALE,
            tree_height,
            tree_radius,
            rng,
        );
        object.photo = Some(asset);
        object
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }
    pub fn visual(&self) -> Visual {
        self.visual
    }
    pub fn is_dust(&self) -> bool {
        self.kind.is_dust()
    }
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }
    pub fn aggregated_target(&self) -> Vec3 {
        self.aggregated_target
    }
    pub fn dispersed_target(&self) -> Vec3 {
        self.dispersed_target
    }
    pub fn spin(&self) -> Vec3 {
        self.spin
    }
    pub fn photo_asset(&self) -> Option<&PhotoAsset> {
        self.photo.as_ref()
    }
    pub fn photo_id(&self) -> Option<&str> {
        self.photo.as_ref().map(|p| p.id.as_str())
    }

    /// Position after applying the scene root transform.
    pub fn world_position(&self, root: &Mat4) -> Vec3 {
        root.transform_point3(self.transform.position)
    }

    fn focus_variant(&self, mode: Mode) -> Option<FocusVariant> {
        match mode {
            Mode::Focused { target, variant } if target == self.id => Some(variant),
            _ => None,
        }
    }

    /// Where this object is heading under `mode`.
    pub fn target_position(&self, ctx: &AnimationContext) -> Vec3 {
        match (ctx.mode, self.focus_variant(ctx.mode)) {
            (_, Some(variant)) => ctx.root_inverse.transform_point3(variant.offset()),
            (Mode::Aggregated, None) => self.aggregated_target,
            _ => self.dispersed_target,
        }
    }

    /// Instantaneous scale target under `mode`.
    pub fn target_scale(&self, ctx: &AnimationContext) -> f32 {
        if self.is_dust() {
            if ctx.mode == Mode::Aggregated {
                return 0.0;
            }
            let pulse = (DUST_PULSE_FREQ * ctx.elapsed + self.pulse_phase).sin();
            return self.base_scale * (0.8 + 0.4 * pulse);
        }
        match (ctx.mode, self.focus_variant(ctx.mode)) {
            (_, Some(variant)) => variant.scale(),
            (Mode::Focused { .. }, None) => self.base_scale * UNFOCUSED_SCALE,
            (Mode::Dispersed, _) if self.kind.is_photo() => self.base_scale * PHOTO_DISPERSED_SCALE,
            _ => self.base_scale,
        }
    }

    pub fn update(&mut self, ctx: &AnimationContext) {
        let dt = ctx.dt.max(0.0);
        let focus = self.focus_variant(ctx.mode);

        let target = self.target_position(ctx);
        let rate = if focus.is_some() {
            FOCUS_LERP_RATE
        } else {
            LERP_RATE
        };
        let k = (rate * dt).min(1.0);
        self.transform.position += (target - self.transform.position) * k;

        match (ctx.mode, focus) {
            (_, Some(variant)) => self.face_camera(ctx, variant),
            (Mode::Aggregated, None) => {
                let k = (TILT_EASE_RATE * dt).min(1.0);
                let r = &mut self.transform.rotation;
                r.x += (0.0 - r.x) * k;
                r.z += (0.0 - r.z) * k;
                r.y = wrap_angle(r.y + AGGREGATED_SPIN_RATE * dt);
            }
            _ => {
                let r = &mut self.transform.rotation;
                r.x = wrap_angle(r.x + self.spin.x * dt);
                r.y = wrap_angle(r.y + self.spin.y * dt);
                r.z = wrap_angle(r.z + self.spin.z * dt);
            }
        }

        let target_scale = self.target_scale(ctx);
        let k = (SCALE_LERP_RATE * dt).min(1.0);
        self.transform.scale += (target_scale - self.transform.scale) * k;
        self.transform.scale = self.transform.scale.max(0.0);
    }

    fn face_camera(&mut self, ctx: &AnimationContext, variant: FocusVariant) {
        let world = ctx.root.transform_point3(self.transform.position);
        let Some(facing) = look_rotation(ctx.camera_eye - world, Vec3::Y) else {
            return;
        };
        let local = ctx.root_rotation.inverse() * facing * variant.tilt();
        let (x, y, z) = local.to_euler(EulerRot::XYZ);
        self.transform.rotation = Vec3::new(x, y, z);
    }
}

/// Rotation turning local +Z toward `forward`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    if forward.length() < MIN_DIRECTION_LEN {
        return None;
    }
    let z = forward.normalize();
    let mut x = up.cross(z);
    if x.length() < MIN_DIRECTION_LEN {
        x = z.any_orthonormal_vector();
    }
    let x = x.normalize();
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)))
}

/// Wrap an angle into `[-PI, PI)`.
pub fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}
