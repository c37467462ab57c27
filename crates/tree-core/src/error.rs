use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("{name} must be greater than {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: f32,
        value: f32,
    },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("falling_top_y ({top}) must be above falling_bottom_y ({bottom})")]
    InvertedFallBounds { top: f32, bottom: f32 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("photo store is unavailable: {0}")]
    Unavailable(String),
    #[error("photo {0} is not in the store")]
    Missing(String),
    #[error("photo store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("a photo with id {0} is already in the scene")]
    DuplicatePhoto(String),
    #[error("no photo with id {0} in the scene")]
    UnknownPhoto(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure reported by a hand-landmark inference engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    /// The engine could not start (no camera, permission denied, missing
    /// model). The worker stops and the scene runs without hand input.
    #[error("hand inference unavailable: {0}")]
    Unavailable(String),
    /// A single inference call failed; the next frame is tried normally.
    #[error("hand inference failed for one frame: {0}")]
    Frame(String),
}
