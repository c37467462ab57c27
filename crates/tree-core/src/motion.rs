//! Process-wide motion state: the current mode, the focus target and the
//! accumulated scene orientation.
//!
//! `Mode::Focused` carries its target and variant, so a focus target exists
//! exactly when the mode is focused. Every transition goes through the
//! methods here and is logged.

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::Rng;

use crate::constants::{
    AGGREGATED_AUTO_YAW, FOCUS_OFFSETS, FOCUS_SCALES, IDLE_AUTO_YAW, PITCH_LEVEL_RATE,
    ROTATION_DEAD_ZONE,
};
use crate::gesture::{GestureSample, GestureSignal};
use crate::object::ObjectId;

/// One of four fixed close-up presentations of the focused object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FocusVariant(u8);

impl FocusVariant {
    pub const COUNT: u8 = 4;

    pub fn new(index: u8) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..Self::COUNT))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Close-up position in world space, before the scene root is undone.
    pub fn offset(self) -> Vec3 {
        FOCUS_OFFSETS[self.index()]
    }

    pub fn scale(self) -> f32 {
        FOCUS_SCALES[self.index()]
    }

    /// Extra local rotation applied after facing the camera.
    pub fn tilt(self) -> Quat {
        match self.0 {
            1 => Quat::from_rotation_z(0.38),
            2 => Quat::from_rotation_z(-0.15),
            3 => Quat::from_rotation_x(-0.4),
            _ => Quat::IDENTITY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Aggregated,
    Dispersed,
    Focused {
        target: ObjectId,
        variant: FocusVariant,
    },
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Aggregated => "aggregated",
            Mode::Dispersed => "dispersed",
            Mode::Focused { .. } => "focused",
        }
    }

    pub fn is_focused(&self) -> bool {
        matches!(self, Mode::Focused { .. })
    }
}

/// Manual mode requests from UI collaborators, outside gesture control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    Aggregate,
    Disperse,
}

/// Accumulated scene orientation in radians. Pitch rotates about X, yaw about Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Rotation {
    /// World transform of the scene root.
    pub fn root_matrix(&self) -> Mat4 {
        Mat4::from_euler(glam::EulerRot::XYZ, self.pitch, self.yaw, 0.0)
    }
}

#[derive(Clone, Debug)]
pub struct MotionState {
    mode: Mode,
    pub rotation: Rotation,
    pub pointer: Vec2,
    pub pointer_active: bool,
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Aggregated,
            rotation: Rotation::default(),
            pointer: Vec2::ZERO,
            pointer_active: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn focus_target(&self) -> Option<ObjectId> {
        match self.mode {
            Mode::Focused { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn focus_variant(&self) -> Option<FocusVariant> {
        match self.mode {
            Mode::Focused { variant, .. } => Some(variant),
            _ => None,
        }
    }

    fn set_mode(&mut self, next: Mode) {
        if next != self.mode {
            log::info!("[mode] {} -> {}", self.mode.label(), next.label());
            self.mode = next;
        }
    }

    pub fn force(&mut self, request: ModeRequest) {
        match request {
            ModeRequest::Aggregate => self.set_mode(Mode::Aggregated),
            ModeRequest::Disperse => self.set_mode(Mode::Dispersed),
        }
    }

    pub fn enter_focus(&mut self, target: ObjectId, variant: FocusVariant) {
        self.set_mode(Mode::Focused { target, variant });
    }

    /// Leave focus when its target disappears from the population.
    pub fn release_focus_on(&mut self, removed: ObjectId) {
        if self.focus_target() == Some(removed) {
            self.set_mode(Mode::Dispersed);
        }
    }

    /// Apply one classifier result.
    ///
    /// Pointer fields are always overwritten. `pick` runs only for a pinch
    /// outside focus and returns the nearest eligible object, if any.
    pub fn apply_gesture<R, F>(&mut self, sample: &GestureSample, pick: F, rng: &mut R)
    where
        R: Rng + ?Sized,
        F: FnOnce() -> Option<ObjectId>,
    {
        self.pointer_active = sample.hand_detected;
        if !sample.hand_detected {
            return;
        }
        self.pointer = sample.pointer;

        match sample.signal {
            GestureSignal::Pinch => {
                if self.mode.is_focused() {
                    return;
                }
                match pick() {
                    Some(target) => {
                        let variant = FocusVariant::random(rng);
                        self.enter_focus(target, variant);
                    }
                    None => log::debug!("[mode] pinch with no object in grab radius"),
                }
            }
            GestureSignal::Fist => self.set_mode(Mode::Aggregated),
            GestureSignal::Open => self.set_mode(Mode::Dispersed),
            GestureSignal::None => {}
        }
    }

    /// Advance the scene orientation by one tick.
    ///
    /// While dispersed with a hand present the pointer steers; elsewhere the
    /// scene turns on its own and the assembled tree levels out.
    pub fn integrate_rotation(&mut self, dt: f32, rotation_speed: f32) {
        match self.mode {
            Mode::Dispersed if self.pointer_active => {
                let (x, y) = (self.pointer.x, self.pointer.y);
                let step = rotation_speed * dt;
                if x > ROTATION_DEAD_ZONE {
                    self.rotation.yaw -= step * (x - ROTATION_DEAD_ZONE);
                } else if x < -ROTATION_DEAD_ZONE {
                    self.rotation.yaw -= step * (x + ROTATION_DEAD_ZONE);
                }
                if y < -ROTATION_DEAD_ZONE {
                    self.rotation.pitch += step * (-y - ROTATION_DEAD_ZONE);
                } else if y > ROTATION_DEAD_ZONE {
                    self.rotation.pitch -= step * (y - ROTATION_DEAD_ZONE);
                }
            }
            Mode::Aggregated => {
                self.rotation.yaw += AGGREGATED_AUTO_YAW * dt;
                let k = (PITCH_LEVEL_RATE * dt).min(1.0);
                self.rotation.pitch += (0.0 - self.rotation.pitch) * k;
            }
            _ => {
                self.rotation.yaw += IDLE_AUTO_YAW * dt;
            }
        }
    }
}
