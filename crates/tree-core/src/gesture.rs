//! Gesture classification from hand landmarks, and the plumbing that carries
//! inference results from the inference thread to the frame loop.
//!
//! The classifier is a stateless per-sample heuristic: a pinch wins over
//! everything, then hand openness decides fist or open palm. Openness between
//! the two thresholds yields no signal.

use glam::{Vec2, Vec3};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::constants::{
    FINGERTIPS, FIST_THRESHOLD, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, OPEN_THRESHOLD,
    PINCH_THRESHOLD, THUMB_TIP, WRIST,
};
use crate::error::InferenceError;

/// One hand as reported by the inference engine: 21 points with x and y
/// normalized to `[0, 1]` image space.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Returns `None` unless exactly `LANDMARK_COUNT` points are given.
    pub fn from_slice(points: &[Vec3]) -> Option<Self> {
        let points: [Vec3; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    /// `None` for indices past the last landmark.
    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Vec3; LANDMARK_COUNT] {
        &mut self.points
    }

    fn xy(&self, index: usize) -> Vec2 {
        self.points[index].truncate()
    }

    /// 2D distance between thumb tip and index tip.
    pub fn pinch_distance(&self) -> f32 {
        self.xy(THUMB_TIP).distance(self.xy(INDEX_TIP))
    }

    /// Mean 2D distance from the wrist to the four fingertips.
    pub fn openness(&self) -> f32 {
        let wrist = self.xy(WRIST);
        let sum: f32 = FINGERTIPS.iter().map(|&i| self.xy(i).distance(wrist)).sum();
        sum / FINGERTIPS.len() as f32
    }

    /// Reference landmark remapped from `[0, 1]` to `[-1, 1]` on both axes.
    pub fn pointer(&self) -> Vec2 {
        let p = self.xy(MIDDLE_MCP);
        ((p - Vec2::splat(0.5)) * 2.0).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureSignal {
    Pinch,
    Fist,
    Open,
    #[default]
    None,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub hand_detected: bool,
    pub pointer: Vec2,
    pub signal: GestureSignal,
}

impl GestureSample {
    pub const NO_HAND: GestureSample = GestureSample {
        hand_detected: false,
        pointer: Vec2::ZERO,
        signal: GestureSignal::None,
    };
}

impl Default for GestureSample {
    fn default() -> Self {
        Self::NO_HAND
    }
}

pub fn classify_metrics(pinch_distance: f32, openness: f32) -> GestureSignal {
    if pinch_distance < PINCH_THRESHOLD {
        GestureSignal::Pinch
    } else if openness < FIST_THRESHOLD {
        GestureSignal::Fist
    } else if openness > OPEN_THRESHOLD {
        GestureSignal::Open
    } else {
        GestureSignal::None
    }
}

pub fn classify(hand: Option<&HandLandmarks>) -> GestureSample {
    match hand {
        Some(hand) => GestureSample {
            hand_detected: true,
            pointer: hand.pointer(),
            signal: classify_metrics(hand.pinch_distance(), hand.openness()),
        },
        None => GestureSample::NO_HAND,
    }
}

// ---------------- Latest-sample cell ----------------

#[derive(Default)]
struct Slot {
    sample: GestureSample,
    seq: u64,
}

/// Single-slot cell holding the most recent classifier output.
///
/// The inference side overwrites it; the frame loop reads it once per tick.
/// Only the latest sample matters, so nothing is queued.
#[derive(Clone, Default)]
pub struct GestureCell {
    slot: Arc<Mutex<Slot>>,
}

impl GestureCell {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn publish(&self, sample: GestureSample) {
        let mut slot = self.lock();
        slot.sample = sample;
        slot.seq += 1;
    }

    pub fn latest(&self) -> GestureSample {
        self.lock().sample
    }

    pub fn reader(&self) -> GestureReader {
        GestureReader {
            cell: self.clone(),
            seen: self.lock().seq,
        }
    }
}

/// Consumer handle that yields each published sample at most once.
#[derive(Clone)]
pub struct GestureReader {
    cell: GestureCell,
    seen: u64,
}

impl GestureReader {
    pub fn poll(&mut self) -> Option<GestureSample> {
        let slot = self.cell.lock();
        if slot.seq == self.seen {
            return None;
        }
        self.seen = slot.seq;
        Some(slot.sample)
    }
}

// ---------------- Inference worker ----------------

/// A pull-based hand-landmark engine. Each call captures the next video
/// frame and returns zero or one hand.
pub trait LandmarkSource: Send + 'static {
    fn start(&mut self) -> Result<(), InferenceError> {
        Ok(())
    }

    /// `timestamp` is monotonic since the worker started.
    fn detect(&mut self, timestamp: Duration) -> Result<Option<HandLandmarks>, InferenceError>;
}

pub struct InferenceWorker {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl InferenceWorker {
    /// Run `source` on its own thread, publishing every classified result
    /// into `cell`.
    pub fn spawn<S: LandmarkSource>(mut source: S, cell: GestureCell) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("hand-inference".into())
            .spawn(move || {
                if let Err(e) = source.start() {
                    log::warn!("[inference] {e}; continuing without hand input");
                    cell.publish(GestureSample::NO_HAND);
                    return;
                }
                log::info!("[inference] started");
                let started = instant::Instant::now();
                while !stop_flag.load(Ordering::Relaxed) {
                    match source.detect(started.elapsed()) {
                        Ok(hand) => cell.publish(classify(hand.as_ref())),
                        Err(InferenceError::Frame(msg)) => {
                            log::debug!("[inference] frame skipped: {msg}");
                            cell.publish(GestureSample::NO_HAND);
                        }
                        Err(e @ InferenceError::Unavailable(_)) => {
                            log::warn!("[inference] {e}; continuing without hand input");
                            cell.publish(GestureSample::NO_HAND);
                            break;
                        }
                    }
                }
                log::info!("[inference] stopped");
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Ask the worker to stop and wait for the call in flight to finish.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[inference] worker thread panicked");
            }
        }
    }
}

impl Drop for InferenceWorker {
    // A stalled inference call must not block teardown, so dropping only
    // signals the thread.
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
