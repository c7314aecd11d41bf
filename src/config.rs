use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::types::{LandmarkId, Viewport};
use crate::zones::Zone;

/// Center proxy is ring[0], pupil proxy is ring[4].
pub const MIN_CONTOUR_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracking: TrackingConfig,
    /// Empty means the standard four-zone layout for the viewport.
    pub zones: Vec<Zone>,
    pub models: ModelConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub blink_threshold: f32,
    pub pointer_step: i32,
    pub left_eye: EyeLandmarkConfig,
    pub right_eye: EyeLandmarkConfig,
}

/// Mesh ids for one eye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyeLandmarkConfig {
    pub upper_lid: LandmarkId,
    pub lower_lid: LandmarkId,
    pub contour: Vec<LandmarkId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub face_mesh: String,
    pub face_detection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub window_title: String,
    pub text_scale: usize,
    pub pointer_radius: i32,
    pub pointer_color_hex: String,
}

impl EyeLandmarkConfig {
    pub fn left() -> Self {
        Self {
            upper_lid: 159,
            lower_lid: 145,
            contour: (145..=159).rev().collect(),
        }
    }

    pub fn right() -> Self {
        Self {
            upper_lid: 386,
            lower_lid: 374,
            contour: (375..=386).rev().collect(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            viewport_width: 640,
            viewport_height: 480,
            blink_threshold: 0.02,
            pointer_step: 10,
            left_eye: EyeLandmarkConfig::left(),
            right_eye: EyeLandmarkConfig::right(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_mesh: "face_mesh.onnx".to_string(),
            face_detection: "face_detection.onnx".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_title: "Eye Tracking".to_string(),
            text_scale: 3,
            pointer_radius: 5,
            pointer_color_hex: "#00FF00".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            zones: Vec::new(),
            models: ModelConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl TrackingConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "config.json";

    /// Loads the config at `path`, falling back to defaults when the file is
    /// missing or unparsable. The result is always written back so new fields
    /// show up in the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    info!("Loaded configuration from {}", path.display());
                    c
                }
                Err(e) => {
                    warn!("Error parsing config {}: {}. Loading defaults.", path.display(), e);
                    Self::default()
                }
            }
        } else {
            info!("Configuration file not found. Creating default at {}", path.display());
            Self::default()
        };

        config.save(path)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Configured zones, or the standard layout when none are configured.
    pub fn effective_zones(&self) -> Vec<Zone> {
        if self.zones.is_empty() {
            Zone::default_layout(self.tracking.viewport())
        } else {
            self.zones.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tracking;
        if t.viewport_width <= 0 || t.viewport_height <= 0 {
            return Err(ConfigError::InvalidViewport {
                width: t.viewport_width,
                height: t.viewport_height,
            });
        }
        if !t.blink_threshold.is_finite() || t.blink_threshold <= 0.0 {
            return Err(ConfigError::InvalidBlinkThreshold(t.blink_threshold));
        }
        let max_step = t.viewport_width.max(t.viewport_height);
        if t.pointer_step <= 0 || t.pointer_step > max_step {
            return Err(ConfigError::InvalidPointerStep {
                step: t.pointer_step,
                max: max_step,
            });
        }
        for (eye, cfg) in [("left", &t.left_eye), ("right", &t.right_eye)] {
            if cfg.contour.len() < MIN_CONTOUR_LEN {
                return Err(ConfigError::ContourRingTooShort {
                    eye,
                    len: cfg.contour.len(),
                    min: MIN_CONTOUR_LEN,
                });
            }
        }

        let zones = self.effective_zones();
        for zone in &zones {
            let in_range = zone.anchor_x.checked_add(zone.width).is_some()
                && zone.anchor_y.checked_sub(zone.margin_top).is_some()
                && zone.anchor_y.checked_add(zone.margin_bottom).is_some()
                && zone.margin_top.checked_add(zone.margin_bottom).is_some();
            if !in_range {
                return Err(ConfigError::ZoneOutOfRange(zone.id.clone()));
            }
            if zone.width <= 0 || zone.margin_top + zone.margin_bottom < 0 {
                return Err(ConfigError::EmptyZone(zone.id.clone()));
            }
        }
        // Overlap is a layout contract, not a hard error.
        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                if a.overlaps(b) {
                    warn!("Zones '{}' and '{}' overlap", a.id, b.id);
                }
            }
        }
        Ok(())
    }
}

/// Parses `#RRGGBB`, falling back to green.
pub fn parse_hex(hex: &str) -> [u8; 3] {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range).and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    if hex.len() == 7 && hex.starts_with('#') {
        if let (Some(r), Some(g), Some(b)) = (channel(1..3), channel(3..5), channel(5..7)) {
            return [r, g, b];
        }
    }
    [0, 255, 0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.effective_zones().len(), 4);
    }

    #[test]
    fn default_contours_match_mesh_ids() {
        let left = EyeLandmarkConfig::left();
        assert_eq!(left.contour.first(), Some(&159));
        assert_eq!(left.contour.get(4), Some(&155));
        assert_eq!(left.contour.len(), 15);

        let right = EyeLandmarkConfig::right();
        assert_eq!(right.contour.first(), Some(&386));
        assert_eq!(right.contour.get(4), Some(&382));
        assert_eq!(right.contour.len(), 12);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.tracking.blink_threshold = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBlinkThreshold(_))
        ));

        let mut config = AppConfig::default();
        config.tracking.right_eye.contour.truncate(3);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ContourRingTooShort { eye: "right", len: 3, min: 5 })
        );

        let mut config = AppConfig::default();
        config.tracking.viewport_height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn validate_bounds_pointer_step() {
        for step in [0, -10, 641, i32::MAX, i32::MIN] {
            let mut config = AppConfig::default();
            config.tracking.pointer_step = step;
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidPointerStep { step, max: 640 })
            );
        }

        let mut config = AppConfig::default();
        config.tracking.pointer_step = 640;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zones_past_i32_range() {
        let mut config = AppConfig::default();
        let mut zone = Zone::new("far", "far", i32::MAX - 5, 100, [0, 0, 0]);
        config.zones = vec![zone.clone()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZoneOutOfRange("far".to_string()))
        );

        zone.anchor_x = 10;
        zone.anchor_y = i32::MIN + 1;
        config.zones = vec![zone.clone()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZoneOutOfRange("far".to_string()))
        );

        zone.anchor_y = 100;
        config.zones = vec![zone];
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "tracking": { "pointer_step": 4 } }"#).unwrap();
        assert_eq!(config.tracking.pointer_step, 4);
        assert_eq!(config.tracking.blink_threshold, 0.02);
        assert_eq!(config.ui.window_title, "Eye Tracking");
    }

    #[test]
    fn load_writes_defaults_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let first = AppConfig::load(&path).unwrap();
        assert!(path.exists());

        let mut edited = first.clone();
        edited.tracking.viewport_width = 800;
        edited.save(&path).unwrap();

        let second = AppConfig::load(&path).unwrap();
        assert_eq!(second.tracking.viewport_width, 800);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#FF0000"), [255, 0, 0]);
        assert_eq!(parse_hex("#0000FF"), [0, 0, 255]);
        assert_eq!(parse_hex("invalid"), [0, 255, 0]);
        assert_eq!(parse_hex("#GG0000"), [0, 255, 0]);
    }
}
