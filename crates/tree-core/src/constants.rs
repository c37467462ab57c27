use glam::Vec3;

// Fixed tuning constants for the scene. Values that users may change at
// startup live in `SceneConfig` instead.

// Gesture classification (normalized landmark units)
pub const PINCH_THRESHOLD: f32 = 0.05; // thumb-tip to index-tip distance
pub const FIST_THRESHOLD: f32 = 0.25; // mean wrist-to-fingertip distance below = fist
pub const OPEN_THRESHOLD: f32 = 0.4; // mean wrist-to-fingertip distance above = open hand

// Hand landmark indices
pub const LANDMARK_COUNT: usize = 21;
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9; // pointer reference
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// Object animation rates (per second)
pub const LERP_RATE: f32 = 4.0;
pub const FOCUS_LERP_RATE: f32 = 8.0;
pub const SCALE_LERP_RATE: f32 = 6.0;
pub const TILT_EASE_RATE: f32 = 1.0;
pub const AGGREGATED_SPIN_RATE: f32 = 0.5; // ornament yaw while assembled

// Scale factors
pub const DUST_PULSE_FREQ: f32 = 4.0;
pub const PHOTO_DISPERSED_SCALE: f32 = 2.5;
pub const UNFOCUSED_SCALE: f32 = 0.8;
pub const PHOTO_BASE_SCALE: f32 = 0.8;

// Focus presentation, indexed by focus variant
pub const FOCUS_OFFSETS: [Vec3; 4] = [
    Vec3::new(0.0, 1.0, 38.0),
    Vec3::new(-4.0, 2.0, 35.0),
    Vec3::new(3.0, 0.0, 32.0),
    Vec3::new(0.0, -2.5, 30.0),
];
pub const FOCUS_SCALES: [f32; 4] = [3.0, 3.0, 3.5, 4.8];

// Scene rotation
pub const ROTATION_DEAD_ZONE: f32 = 0.3;
pub const AGGREGATED_AUTO_YAW: f32 = 0.3;
pub const IDLE_AUTO_YAW: f32 = 0.1;
pub const PITCH_LEVEL_RATE: f32 = 2.0;

// Dispersed sphere radii: base + span * random()
pub const DISPERSED_RADIUS_BASE: f32 = 8.0;
pub const DISPERSED_RADIUS_SPAN: f32 = 12.0;
pub const DUST_DISPERSED_RADIUS_BASE: f32 = 12.0;
pub const DUST_DISPERSED_RADIUS_SPAN: f32 = 20.0;

// Aggregated cone
pub const CONE_HEIGHT_BIAS: f32 = 0.8; // exponent applied to the height sample
pub const CONE_MIN_RADIUS: f32 = 0.5;
pub const CONE_SPIRAL_TURNS: f32 = 50.0; // in units of PI over the full height

// Spin rate multipliers: (random() - 0.5) * multiplier
pub const PHOTO_SPIN_MULTIPLIER: f32 = 0.3;
pub const ORNAMENT_SPIN_MULTIPLIER: f32 = 2.0;

// Falling atmosphere
pub const STAR_FRACTION: f32 = 0.3;
pub const FALL_SPAWN_X_FACTOR: f32 = 1.5; // spawn width = range_x * factor
pub const FALL_WOBBLE_SPEED_MAX: f32 = 2.0;
pub const FALL_WOBBLE_AMP_MAX: f32 = 0.5;
pub const FALL_PHASE_MAX: f32 = 100.0;
pub const FALL_SPIN_X: f32 = 1.0;
pub const FALL_SPIN_Z: f32 = 0.5;

// Tree-top star, fixed in the scene root
pub const TOPPER_LIFT: f32 = 1.2; // above the cone apex
pub const TOPPER_SIZE: f32 = 2.4;
pub const TOPPER_COLOR: [f32; 4] = [1.0, 0.867, 0.533, 1.0];

// Camera
pub const CAMERA_HEIGHT: f32 = 2.0;
pub const CAMERA_FOVY_DEGREES: f32 = 42.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Guards for degenerate geometry
pub const MIN_DIRECTION_LEN: f32 = 1e-5;

// Frame loop
pub const MAX_FRAME_DT: f32 = 0.25; // longer stalls are treated as this
