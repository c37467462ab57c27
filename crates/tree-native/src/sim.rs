//! Keyboard and mouse simulation of a hand-landmark engine.
//!
//! The window thread writes the desired pose into a shared [`SimControl`];
//! [`SimulatedHand`] runs on the inference thread and turns it into 21
//! landmarks shaped so the core classifier reads back the same gesture.

use glam::{Vec2, Vec3};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tree_core::constants::{
    FINGERTIPS, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, THUMB_TIP, WRIST,
};
use tree_core::{HandLandmarks, InferenceError, LandmarkSource};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Pinch,
    Fist,
    Open,
    /// Half-curled fingers; classifies as no gesture.
    Relaxed,
}

#[derive(Clone, Copy, Debug)]
pub struct SimControl {
    pub present: bool,
    pub pose: Pose,
    /// Cursor position in `[0, 1]` window space.
    pub cursor: Vec2,
}

impl Default for SimControl {
    fn default() -> Self {
        Self {
            present: false,
            pose: Pose::Relaxed,
            cursor: Vec2::splat(0.5),
        }
    }
}

pub type SharedControl = Arc<Mutex<SimControl>>;

pub struct SimulatedHand {
    control: SharedControl,
    available: bool,
}

impl SimulatedHand {
    pub fn new(control: SharedControl) -> Self {
        Self {
            control,
            available: true,
        }
    }

    /// A source whose engine never comes up, for running without hand input.
    pub fn unavailable(control: SharedControl) -> Self {
        Self {
            control,
            available: false,
        }
    }
}

impl LandmarkSource for SimulatedHand {
    fn start(&mut self) -> Result<(), InferenceError> {
        if self.available {
            Ok(())
        } else {
            Err(InferenceError::Unavailable("hand input disabled".into()))
        }
    }

    fn detect(&mut self, _timestamp: Duration) -> Result<Option<HandLandmarks>, InferenceError> {
        std::thread::sleep(FRAME_INTERVAL);
        let control = *self
            .control
            .lock()
            .map_err(|_| InferenceError::Frame("control lock poisoned".into()))?;
        if !control.present {
            return Ok(None);
        }
        Ok(Some(synthesize(control.pose, control.cursor)))
    }
}

/// Build a hand whose reference landmark sits at `cursor`.
pub fn synthesize(pose: Pose, cursor: Vec2) -> HandLandmarks {
    let anchor = cursor.clamp(Vec2::ZERO, Vec2::ONE);
    let wrist = anchor + Vec2::new(0.0, 0.15);
    // fingertip height above the anchor; sets openness
    let reach = match pose {
        Pose::Open | Pose::Pinch => -0.3,
        Pose::Relaxed => -0.17,
        Pose::Fist => 0.02,
    };

    let mut points = [Vec3::ZERO; LANDMARK_COUNT];
    // palm and knuckle joints sit between wrist and anchor
    for (i, p) in points.iter_mut().enumerate() {
        let t = i as f32 / (LANDMARK_COUNT - 1) as f32;
        *p = wrist.lerp(anchor, t).extend(0.0);
    }
    points[WRIST] = wrist.extend(0.0);
    points[MIDDLE_MCP] = anchor.extend(0.0);

    let spread = [-0.06, -0.02, 0.02, 0.06];
    for (&tip, dx) in FINGERTIPS.iter().zip(spread) {
        points[tip] = (anchor + Vec2::new(dx, reach)).extend(0.0);
    }
    points[THUMB_TIP] = match pose {
        Pose::Pinch => points[INDEX_TIP],
        Pose::Fist => (anchor + Vec2::new(-0.12, 0.10)).extend(0.0),
        Pose::Open | Pose::Relaxed => (anchor + Vec2::new(-0.18, 0.0)).extend(0.0),
    };
    HandLandmarks::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_core::{classify, GestureSignal};

    #[test]
    fn synthesized_poses_classify_as_requested() {
        let cursor = Vec2::new(0.3, 0.6);
        let cases = [
            (Pose::Pinch, GestureSignal::Pinch),
            (Pose::Fist, GestureSignal::Fist),
            (Pose::Open, GestureSignal::Open),
            (Pose::Relaxed, GestureSignal::None),
        ];
        for (pose, expected) in cases {
            let sample = classify(Some(&synthesize(pose, cursor)));
            assert!(sample.hand_detected);
            assert_eq!(sample.signal, expected, "{pose:?}");
        }
    }

    #[test]
    fn pointer_follows_cursor() {
        let sample = classify(Some(&synthesize(Pose::Open, Vec2::new(0.75, 0.25))));
        assert!((sample.pointer - Vec2::new(0.5, -0.5)).length() < 1e-5);
    }

    #[test]
    fn absent_hand_detects_nothing() {
        let control = SharedControl::default();
        let mut hand = SimulatedHand::new(control);
        assert!(hand.start().is_ok());
        assert_eq!(hand.detect(Duration::ZERO), Ok(None));
    }

    #[test]
    fn unavailable_source_fails_to_start() {
        let mut hand = SimulatedHand::unavailable(SharedControl::default());
        assert!(matches!(hand.start(), Err(InferenceError::Unavailable(_))));
    }
}
