//! Eye openness from lid-to-lid distance.

use serde::{Deserialize, Serialize};

use crate::config::EyeLandmarkConfig;
use crate::error::TrackingResult;
use crate::types::{FaceLandmarkFrame, LandmarkId};

/// Vertical lid distance per eye, in normalized frame units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeAperture {
    pub left: f32,
    pub right: f32,
}

#[derive(Debug, Clone, Copy)]
struct LidPair {
    upper: LandmarkId,
    lower: LandmarkId,
}

impl From<&EyeLandmarkConfig> for LidPair {
    fn from(cfg: &EyeLandmarkConfig) -> Self {
        Self {
            upper: cfg.upper_lid,
            lower: cfg.lower_lid,
        }
    }
}

pub struct EyeOpennessEstimator {
    threshold: f32,
    left: LidPair,
    right: LidPair,
}

impl EyeOpennessEstimator {
    pub fn new(threshold: f32, left: &EyeLandmarkConfig, right: &EyeLandmarkConfig) -> Self {
        Self {
            threshold,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn aperture(&self, frame: &FaceLandmarkFrame) -> TrackingResult<EyeAperture> {
        let lid_distance = |pair: LidPair| -> TrackingResult<f32> {
            let upper = frame.require(pair.upper)?;
            let lower = frame.require(pair.lower)?;
            Ok(upper.distance_to(lower))
        };
        Ok(EyeAperture {
            left: lid_distance(self.left)?,
            right: lid_distance(self.right)?,
        })
    }

    /// Returns the apertures and the session-wide blink flag.
    pub fn estimate(&self, frame: &FaceLandmarkFrame) -> TrackingResult<(EyeAperture, bool)> {
        let aperture = self.aperture(frame)?;
        Ok((aperture, is_blink(aperture, self.threshold)))
    }
}

/// Either eye below threshold counts; this is not a wink detector.
pub fn is_blink(aperture: EyeAperture, threshold: f32) -> bool {
    aperture.left < threshold || aperture.right < threshold
}
