//! The per-session control loop state and its single-tick update.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::blink::{EyeAperture, EyeOpennessEstimator};
use crate::config::AppConfig;
use crate::error::{ConfigError, TrackingError, TrackingResult};
use crate::gaze::{GazeDirectionEstimator, GazeSample};
use crate::pointer::PointerController;
use crate::selection::SelectionStateMachine;
use crate::types::{Direction, FaceLandmarkFrame, LandmarkId, Pointer};
use crate::zones::{HitTester, Zone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickStatus {
    Tracked,
    NoFace,
    MissingLandmark { id: LandmarkId },
}

/// What the estimators saw on a tracked tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceReading {
    pub blink: bool,
    pub aperture: EyeAperture,
    pub gaze: GazeSample,
    pub direction: Direction,
    pub horizontal_label: String,
    pub vertical_label: String,
    pub hit_zone: Option<String>,
}

/// Emitted once per tick for the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    pub tick: u64,
    pub status: TickStatus,
    pub pointer: Pointer,
    pub face: Option<FaceReading>,
    pub selected: bool,
    pub selected_zone: Option<String>,
}

impl TickOutput {
    pub fn blink(&self) -> bool {
        self.face.as_ref().is_some_and(|f| f.blink)
    }
}

/// Owns the pointer and the selection latch. Driven by exactly one loop.
pub struct Session {
    blink: EyeOpennessEstimator,
    gaze: GazeDirectionEstimator,
    controller: PointerController,
    hit_tester: HitTester,
    selection: SelectionStateMachine,
    pointer: Pointer,
    ticks: u64,
}

impl Session {
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let t = &config.tracking;
        let controller = PointerController::new(t.viewport(), t.pointer_step);
        Ok(Self {
            blink: EyeOpennessEstimator::new(t.blink_threshold, &t.left_eye, &t.right_eye),
            gaze: GazeDirectionEstimator::new(&t.left_eye, &t.right_eye)?,
            hit_tester: HitTester::new(config.effective_zones()),
            selection: SelectionStateMachine::new(),
            pointer: controller.home(),
            controller,
            ticks: 0,
        })
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Places the pointer directly, clamped to the viewport.
    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = crate::pointer::clamp(pointer, self.controller.viewport());
    }

    pub fn zones(&self) -> &[Zone] {
        self.hit_tester.zones()
    }

    pub fn selection(&self) -> &SelectionStateMachine {
        &self.selection
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one control-loop tick. `None` means no face this frame.
    pub fn tick(&mut self, frame: Option<&FaceLandmarkFrame>) -> TickOutput {
        let tick = self.ticks;
        self.ticks += 1;

        let (status, face) = match frame {
            None => (TickStatus::NoFace, None),
            Some(frame) if frame.is_empty() => (TickStatus::NoFace, None),
            Some(frame) => match self.track(tick, frame) {
                Ok(reading) => (TickStatus::Tracked, Some(reading)),
                Err(TrackingError::MissingLandmark { id }) => {
                    warn!(tick, id, "Landmark missing from face frame, skipping tick");
                    (TickStatus::MissingLandmark { id }, None)
                }
            },
        };

        TickOutput {
            tick,
            status,
            pointer: self.pointer,
            face,
            selected: self.selection.is_selected(),
            selected_zone: self.selection.zone().map(str::to_string),
        }
    }

    /// Reads every landmark before mutating anything, so a missing id leaves
    /// the session untouched.
    fn track(&mut self, tick: u64, frame: &FaceLandmarkFrame) -> TrackingResult<FaceReading> {
        let (aperture, blink) = self.blink.estimate(frame)?;
        let (gaze, direction) = self.gaze.estimate(frame)?;

        self.controller.update(&mut self.pointer, direction);
        let hit_zone = self.hit_tester.zone_at(self.pointer).map(|z| z.id.clone());
        self.selection.update(tick, blink, hit_zone.as_deref());

        debug!(
            tick,
            x = self.pointer.x,
            y = self.pointer.y,
            blink,
            horizontal = direction.horizontal.label(),
            vertical = direction.vertical.label(),
            "Tick"
        );

        Ok(FaceReading {
            blink,
            aperture,
            gaze,
            direction,
            horizontal_label: direction.horizontal.label().to_string(),
            vertical_label: direction.vertical.label().to_string(),
            hit_zone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_face() -> FaceLandmarkFrame {
        let mut f = FaceLandmarkFrame::default();
        // Lids, wide open.
        f.set(159, 0.40, 0.40);
        f.set(145, 0.40, 0.45);
        f.set(386, 0.60, 0.40);
        f.set(374, 0.60, 0.45);
        // Pupil proxies.
        f.set(155, 0.45, 0.41);
        f.set(382, 0.60, 0.40);
        f
    }

    #[test]
    fn starts_centered_and_idle() {
        let session = Session::new(&AppConfig::default()).unwrap();
        assert_eq!(session.pointer(), Pointer::new(320, 240));
        assert!(!session.selection().is_selected());
        assert_eq!(session.zones().len(), 4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.tracking.pointer_step = 0;
        assert!(matches!(Session::new(&config), Err(ConfigError::InvalidPointerStep { .. })));
    }

    #[test]
    fn oversized_pointer_step_is_rejected() {
        let mut config = AppConfig::default();
        config.tracking.pointer_step = i32::MAX;
        assert_eq!(
            Session::new(&config).err(),
            Some(ConfigError::InvalidPointerStep { step: i32::MAX, max: 640 })
        );
    }

    #[test]
    fn empty_frame_counts_as_no_face() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        session.set_pointer(Pointer::new(60, 240));
        let out = session.tick(Some(&FaceLandmarkFrame::default()));
        assert_eq!(out.status, TickStatus::NoFace);
        assert_eq!(out.face, None);
        assert_eq!(session.pointer(), Pointer::new(60, 240));
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn tracked_tick_reports_reading() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        let out = session.tick(Some(&open_face()));
        assert_eq!(out.status, TickStatus::Tracked);
        assert_eq!(out.tick, 0);
        let face = out.face.unwrap();
        assert!(!face.blink);
        assert_eq!(face.horizontal_label, "Look Left");
        assert_eq!(face.vertical_label, "Look Up");
        // (310, 230) ties to the vertical axis.
        assert_eq!(out.pointer, Pointer::new(320, 230));
    }

    #[test]
    fn missing_landmark_leaves_state_untouched() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        session.set_pointer(Pointer::new(60, 240));
        let mut frame = open_face();
        frame.landmarks.retain(|lm| lm.id != 382);

        let out = session.tick(Some(&frame));
        assert_eq!(out.status, TickStatus::MissingLandmark { id: 382 });
        assert_eq!(out.face, None);
        assert_eq!(session.pointer(), Pointer::new(60, 240));
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn set_pointer_clamps() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        session.set_pointer(Pointer::new(-20, 900));
        assert_eq!(session.pointer(), Pointer::new(0, 480));
    }

    #[test]
    fn tick_output_serializes_status_tag() {
        let mut session = Session::new(&AppConfig::default()).unwrap();
        let out = session.tick(None);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["status"]["kind"], "no_face");
        assert_eq!(json["face"], serde_json::Value::Null);
    }
}
