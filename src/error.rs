//! Error types for tracking and configuration.

use thiserror::Error;

use crate::types::LandmarkId;

/// Result type for per-tick tracking operations.
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Recoverable errors raised while reading a single landmark frame.
///
/// None of these terminate the control loop; the session skips the tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    #[error("landmark {id} missing from face frame")]
    MissingLandmark { id: LandmarkId },
}

/// Errors raised by [`crate::config::AppConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: i32, height: i32 },

    #[error("blink threshold must be a positive finite number, got {0}")]
    InvalidBlinkThreshold(f32),

    #[error("pointer step must be between 1 and {max}, got {step}")]
    InvalidPointerStep { step: i32, max: i32 },

    #[error("{eye} eye contour ring needs at least {min} landmark ids, got {len}")]
    ContourRingTooShort {
        eye: &'static str,
        len: usize,
        min: usize,
    },

    #[error("zone '{0}' has zero width or empty hit band")]
    EmptyZone(String),

    #[error("zone '{0}' extends past the representable coordinate range")]
    ZoneOutOfRange(String),
}
