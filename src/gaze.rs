use serde::{Deserialize, Serialize};

use crate::config::{EyeLandmarkConfig, MIN_CONTOUR_LEN};
use crate::error::{ConfigError, TrackingResult};
use crate::types::{Direction, FaceLandmarkFrame, Horizontal, LandmarkId, Vertical};

// =========================================================================
// Gaze Sample
// Pupil-proxy offsets relative to the eye-center proxy, per eye.
// =========================================================================

/// Signed per-eye offsets. The right eye is stored with its sign flipped
/// (`center - pupil`) because the two eyes are mirrored in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GazeSample {
    pub left_dx: f32,
    pub left_dy: f32,
    pub right_dx: f32,
    pub right_dy: f32,
}

#[derive(Debug, Clone, Copy)]
struct EyeProxies {
    center: LandmarkId,
    pupil: LandmarkId,
}

impl EyeProxies {
    const CENTER_INDEX: usize = 0;
    const PUPIL_INDEX: usize = 4;

    fn from_ring(eye: &'static str, ring: &[LandmarkId]) -> Result<Self, ConfigError> {
        match (ring.get(Self::CENTER_INDEX), ring.get(Self::PUPIL_INDEX)) {
            (Some(&center), Some(&pupil)) => Ok(Self { center, pupil }),
            _ => Err(ConfigError::ContourRingTooShort {
                eye,
                len: ring.len(),
                min: MIN_CONTOUR_LEN,
            }),
        }
    }
}

// =========================================================================
// Gaze Direction Estimator
// =========================================================================
pub struct GazeDirectionEstimator {
    left: EyeProxies,
    right: EyeProxies,
}

impl GazeDirectionEstimator {
    pub fn new(left: &EyeLandmarkConfig, right: &EyeLandmarkConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            left: EyeProxies::from_ring("left", &left.contour)?,
            right: EyeProxies::from_ring("right", &right.contour)?,
        })
    }

    pub fn sample(&self, frame: &FaceLandmarkFrame) -> TrackingResult<GazeSample> {
        let offset = |eye: EyeProxies| -> TrackingResult<(f32, f32)> {
            let center = frame.require(eye.center)?;
            let pupil = frame.require(eye.pupil)?;
            Ok((pupil.x - center.x, pupil.y - center.y))
        };
        let (left_dx, left_dy) = offset(self.left)?;
        let (right_dx, right_dy) = offset(self.right)?;
        Ok(GazeSample {
            left_dx,
            left_dy,
            right_dx: -right_dx,
            right_dy: -right_dy,
        })
    }

    pub fn estimate(&self, frame: &FaceLandmarkFrame) -> TrackingResult<(GazeSample, Direction)> {
        let sample = self.sample(frame)?;
        Ok((sample, resolve_direction(&sample)))
    }
}

// Pure functions for regression testing.
//
// The eye with the larger offset magnitude decides, each under its own sign
// convention: left eye positive means Left/Up, right eye negative means
// Left/Up. Ties go to the right eye. Near-zero offsets still pick a side.

pub fn resolve_horizontal(left_dx: f32, right_dx: f32) -> Horizontal {
    let look_left = if left_dx.abs() > right_dx.abs() {
        left_dx > 0.0
    } else {
        right_dx < 0.0
    };
    if look_left {
        Horizontal::Left
    } else {
        Horizontal::Right
    }
}

pub fn resolve_vertical(left_dy: f32, right_dy: f32) -> Vertical {
    let look_up = if left_dy.abs() > right_dy.abs() {
        left_dy > 0.0
    } else {
        right_dy < 0.0
    };
    if look_up {
        Vertical::Up
    } else {
        Vertical::Down
    }
}

pub fn resolve_direction(sample: &GazeSample) -> Direction {
    Direction::new(
        resolve_horizontal(sample.left_dx, sample.right_dx),
        resolve_vertical(sample.left_dy, sample.right_dy),
    )
}
