use anyhow::Result;
use image::RgbImage;

use crate::config::TrackingConfig;
use crate::types::FaceLandmarkFrame;

/// Extracts one face's landmarks from a camera frame.
pub trait LandmarkPipeline {
    fn name(&self) -> String;
    /// `Ok(None)` when no face is in the frame.
    fn process(&mut self, frame: &RgbImage) -> Result<Option<FaceLandmarkFrame>>;
}

// Synthetic face used when the mesh model is not available
pub struct SimulatedFacePipeline {
    tracking: TrackingConfig,
    frame_count: u32,
}

impl SimulatedFacePipeline {
    /// Frames per full pupil sweep.
    const SWEEP_PERIOD: u32 = 240;
    /// Every `BLINK_EVERY` frames the eyes close for `BLINK_LENGTH` frames.
    const BLINK_EVERY: u32 = 90;
    const BLINK_LENGTH: u32 = 4;

    pub fn new(tracking: &TrackingConfig) -> Self {
        Self {
            tracking: tracking.clone(),
            frame_count: 0,
        }
    }

    /// Builds the face seen at frame `n` without advancing the counter.
    pub fn synthesize(&self, n: u32) -> FaceLandmarkFrame {
        let (ox, oy) = Self::sweep_offset(n);

        let blinking = n % Self::BLINK_EVERY < Self::BLINK_LENGTH;
        let lid_gap = if blinking { 0.005 } else { 0.03 };

        let mut frame = FaceLandmarkFrame::default();
        let eyes = [
            (&self.tracking.left_eye, 0.40_f32),
            (&self.tracking.right_eye, 0.60_f32),
        ];
        for (eye, cx) in eyes {
            let cy = 0.42;
            // Spread the contour ring on an ellipse so every id is present.
            let ring_len = eye.contour.len().max(1) as f32;
            for (i, &id) in eye.contour.iter().enumerate() {
                let a = i as f32 / ring_len * std::f32::consts::TAU;
                frame.set(id, cx + a.cos() * 0.03, cy + a.sin() * 0.012);
            }
            if let Some(&center) = eye.contour.first() {
                frame.set(center, cx, cy);
            }
            if let Some(&pupil) = eye.contour.get(4) {
                // Same raw shift in both eyes: the right eye's flipped sign
                // convention already makes them agree.
                frame.set(pupil, cx + ox, cy + oy);
            }
            frame.set(eye.upper_lid, cx, cy - lid_gap / 2.0);
            frame.set(eye.lower_lid, cx, cy + lid_gap / 2.0);
        }
        frame
    }

    /// Pupil shift from the eye center at frame `n`.
    fn sweep_offset(n: u32) -> (f32, f32) {
        let t = (n % Self::SWEEP_PERIOD) as f32 / Self::SWEEP_PERIOD as f32
            * std::f32::consts::TAU;
        // Large enough to beat float noise, small enough to stay inside the eye.
        (t.cos() * 0.01, t.sin() * 0.006)
    }
}

impl LandmarkPipeline for SimulatedFacePipeline {
    fn name(&self) -> String {
        "Simulated Face (no ONNX)".to_string()
    }

    fn process(&mut self, _frame: &RgbImage) -> Result<Option<FaceLandmarkFrame>> {
        let face = self.synthesize(self.frame_count);
        self.frame_count = self.frame_count.wrapping_add(1);
        Ok(Some(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blink::EyeOpennessEstimator;
    use crate::gaze::GazeDirectionEstimator;

    #[test]
    fn simulated_face_contains_every_configured_id() {
        let tracking = TrackingConfig::default();
        let sim = SimulatedFacePipeline::new(&tracking);
        let face = sim.synthesize(17);
        for eye in [&tracking.left_eye, &tracking.right_eye] {
            for id in eye.contour.iter().chain([&eye.upper_lid, &eye.lower_lid]) {
                assert!(face.get(*id).is_some(), "missing {}", id);
            }
        }
    }

    #[test]
    fn simulated_face_blinks_periodically() {
        let tracking = TrackingConfig::default();
        let sim = SimulatedFacePipeline::new(&tracking);
        let est = EyeOpennessEstimator::new(
            tracking.blink_threshold,
            &tracking.left_eye,
            &tracking.right_eye,
        );
        assert!(est.estimate(&sim.synthesize(0)).unwrap().1);
        assert!(!est.estimate(&sim.synthesize(10)).unwrap().1);
        assert!(est.estimate(&sim.synthesize(90)).unwrap().1);
    }

    #[test]
    fn simulated_gaze_follows_the_sweep() {
        use crate::types::{Horizontal, Vertical};

        let tracking = TrackingConfig::default();
        let sim = SimulatedFacePipeline::new(&tracking);
        let gaze = GazeDirectionEstimator::new(&tracking.left_eye, &tracking.right_eye).unwrap();
        for n in 0..SimulatedFacePipeline::SWEEP_PERIOD {
            let (ox, oy) = SimulatedFacePipeline::sweep_offset(n);
            let (sample, direction) = gaze.estimate(&sim.synthesize(n)).unwrap();
            // Near the zero crossings the offset is lost in rounding.
            if ox.abs() > 1e-4 {
                let expected = if ox > 0.0 { Horizontal::Left } else { Horizontal::Right };
                assert_eq!(direction.horizontal, expected, "n={} {:?}", n, sample);
                assert_eq!(sample.left_dx > 0.0, sample.right_dx < 0.0, "n={}", n);
            }
            if oy.abs() > 1e-4 {
                let expected = if oy > 0.0 { Vertical::Up } else { Vertical::Down };
                assert_eq!(direction.vertical, expected, "n={} {:?}", n, sample);
                assert_eq!(sample.left_dy > 0.0, sample.right_dy < 0.0, "n={}", n);
            }
        }
    }

    #[test]
    fn simulated_face_produces_a_direction() {
        let tracking = TrackingConfig::default();
        let mut sim = SimulatedFacePipeline::new(&tracking);
        let gaze = GazeDirectionEstimator::new(&tracking.left_eye, &tracking.right_eye).unwrap();
        let blank = RgbImage::new(4, 4);
        for _ in 0..3 {
            let face = sim.process(&blank).unwrap().unwrap();
            assert!(gaze.estimate(&face).is_ok());
        }
    }
}
