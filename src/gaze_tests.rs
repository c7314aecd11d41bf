#[cfg(test)]
mod tests {
    use crate::config::EyeLandmarkConfig;
    use crate::error::{ConfigError, TrackingError};
    use crate::gaze::{resolve_direction, resolve_horizontal, resolve_vertical, GazeDirectionEstimator, GazeSample};
    use crate::types::{FaceLandmarkFrame, Horizontal, Vertical};

    // =========================================================================
    // Regression Tests: Gaze Direction
    // Left eye: positive offset = Left / Up.
    // Right eye (stored as center - pupil): negative offset = Left / Up.
    // =========================================================================

    fn estimator() -> GazeDirectionEstimator {
        GazeDirectionEstimator::new(&EyeLandmarkConfig::left(), &EyeLandmarkConfig::right()).unwrap()
    }

    /// Places the center/pupil proxies (159/155 and 386/382) with the given
    /// raw pupil displacements.
    fn frame(left_pupil: (f32, f32), right_pupil: (f32, f32)) -> FaceLandmarkFrame {
        let mut f = FaceLandmarkFrame::default();
        f.set(159, 0.40, 0.40);
        f.set(155, 0.40 + left_pupil.0, 0.40 + left_pupil.1);
        f.set(386, 0.60, 0.40);
        f.set(382, 0.60 + right_pupil.0, 0.40 + right_pupil.1);
        f
    }

    #[test]
    fn test_left_eye_dominant_horizontal() {
        // leftDx = 0.05, rightDx = -0.02: left eye wins, positive -> Left.
        assert_eq!(resolve_horizontal(0.05, -0.02), Horizontal::Left);
        assert_eq!(resolve_horizontal(-0.05, 0.02), Horizontal::Right);
    }

    #[test]
    fn test_right_eye_dominant_horizontal() {
        assert_eq!(resolve_horizontal(0.01, -0.04), Horizontal::Left);
        assert_eq!(resolve_horizontal(0.01, 0.04), Horizontal::Right);
    }

    #[test]
    fn test_tie_goes_to_right_eye() {
        // |0.03| == |0.03|, right eye decides; 0.03 is not < 0 -> Right.
        assert_eq!(resolve_horizontal(0.03, 0.03), Horizontal::Right);
        assert_eq!(resolve_vertical(0.03, -0.03), Vertical::Up);
    }

    #[test]
    fn test_zero_offset_still_picks_a_side() {
        assert_eq!(resolve_horizontal(0.0, 0.0), Horizontal::Right);
        assert_eq!(resolve_vertical(0.0, 0.0), Vertical::Down);
    }

    #[test]
    fn test_vertical_resolution() {
        assert_eq!(resolve_vertical(0.05, 0.01), Vertical::Up);
        assert_eq!(resolve_vertical(-0.05, 0.01), Vertical::Down);
        assert_eq!(resolve_vertical(0.01, -0.05), Vertical::Up);
        assert_eq!(resolve_vertical(0.01, 0.05), Vertical::Down);
    }

    #[test]
    fn test_right_eye_sign_is_flipped_in_sample() {
        // Right pupil moves +x in the frame; stored offset is negative.
        let sample = estimator().sample(&frame((0.0, 0.0), (0.03, -0.01))).unwrap();
        assert!((sample.right_dx + 0.03).abs() < 1e-6);
        assert!((sample.right_dy - 0.01).abs() < 1e-6);
        assert_eq!(sample.left_dx, 0.0);
    }

    #[test]
    fn test_same_frame_motion_maps_to_opposite_eyes() {
        // Both pupils shift +x in the frame. Whichever eye dominates, the
        // result is Left: left offset is positive, flipped right offset negative.
        let (_, dir) = estimator().estimate(&frame((0.02, 0.0), (0.02, 0.0))).unwrap();
        assert_eq!(dir.horizontal, Horizontal::Left);
    }

    #[test]
    fn test_estimate_from_frame() {
        let (sample, dir) = estimator().estimate(&frame((0.05, 0.01), (0.02, 0.0))).unwrap();
        assert!((sample.left_dx - 0.05).abs() < 1e-6);
        assert_eq!(dir.horizontal, Horizontal::Left);
        assert_eq!(dir.vertical, Vertical::Up);
        assert_eq!(dir, resolve_direction(&sample));
    }

    #[test]
    fn test_missing_pupil_proxy() {
        let mut f = frame((0.0, 0.0), (0.0, 0.0));
        f.landmarks.retain(|lm| lm.id != 382);
        assert_eq!(
            estimator().sample(&f).err(),
            Some(TrackingError::MissingLandmark { id: 382 })
        );
    }

    #[test]
    fn test_short_ring_is_rejected() {
        let mut left = EyeLandmarkConfig::left();
        left.contour.truncate(4);
        assert!(matches!(
            GazeDirectionEstimator::new(&left, &EyeLandmarkConfig::right()),
            Err(ConfigError::ContourRingTooShort { eye: "left", len: 4, .. })
        ));
    }

    #[test]
    fn test_default_sample_is_right_down() {
        let dir = resolve_direction(&GazeSample::default());
        assert_eq!((dir.horizontal, dir.vertical), (Horizontal::Right, Vertical::Down));
    }
}
