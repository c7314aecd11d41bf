use anyhow::Result;
use image::{imageops::FilterType, RgbImage};
use ort::session::Session;
use std::path::Path;
use tracing::{info, warn};

use crate::config::ModelConfig;
use crate::detector::{build_session, FaceDetector};
use crate::pipeline::LandmarkPipeline;
use crate::types::{FaceLandmarkFrame, Rect};

const MESH_INPUT: u32 = 192;
const MESH_POINTS: usize = 468;
/// Extra context around the detector box, as a fraction of its size.
const ROI_PADDING: f32 = 0.25;

/// MediaPipe face mesh over an UltraFace crop.
///
/// Landmarks are returned normalized to the full frame, ids are mesh indices.
pub struct FaceMeshPipeline {
    mesh: Session,
    detector: Option<FaceDetector>,
}

impl FaceMeshPipeline {
    /// Fails if the mesh model is missing. A missing detector degrades to
    /// running the mesh on the whole frame.
    pub fn new(models: &ModelConfig) -> Result<Self> {
        let detector = if Path::new(&models.face_detection).exists() {
            info!("Loading face detector from {}", models.face_detection);
            Some(FaceDetector::new(&models.face_detection)?)
        } else {
            warn!(
                "Face detector {} not found, running mesh on the full frame",
                models.face_detection
            );
            None
        };

        info!("Loading face mesh from {}", models.face_mesh);
        Ok(Self {
            mesh: build_session(&models.face_mesh)?,
            detector,
        })
    }

    fn region_of_interest(&mut self, frame: &RgbImage) -> Result<Option<Rect>> {
        let (w, h) = (frame.width() as f32, frame.height() as f32);
        match &mut self.detector {
            Some(det) => Ok(det
                .detect(frame)?
                .map(|r| r.padded_within(ROI_PADDING, w, h))
                .filter(|r| r.width >= 1.0 && r.height >= 1.0)),
            None => Ok(Some(Rect::new(0.0, 0.0, w, h))),
        }
    }
}

impl LandmarkPipeline for FaceMeshPipeline {
    fn name(&self) -> String {
        "Face Mesh (468 pts)".to_string()
    }

    fn process(&mut self, frame: &RgbImage) -> Result<Option<FaceLandmarkFrame>> {
        let Some(roi) = self.region_of_interest(frame)? else {
            return Ok(None);
        };

        let crop = image::imageops::crop_imm(
            frame,
            roi.x as u32,
            roi.y as u32,
            roi.width as u32,
            roi.height as u32,
        )
        .to_image();
        let resized = image::imageops::resize(&crop, MESH_INPUT, MESH_INPUT, FilterType::Triangle);

        // NHWC, scaled to [-1, 1].
        let input_data: Vec<f32> = resized
            .pixels()
            .flat_map(|p| p.0)
            .map(|v| v as f32 / 127.5 - 1.0)
            .collect();
        let size = MESH_INPUT as usize;
        let input = ort::value::Tensor::from_array((vec![1, size, size, 3], input_data))?;
        let outputs = self.mesh.run(ort::inputs![input])?;
        let (_, raw) = outputs[0].try_extract_tensor::<f32>()?;

        Ok(mesh_to_frame(raw, roi, frame.width() as f32, frame.height() as f32))
    }
}

/// Maps mesh output (x, y, z triples in crop-input pixels) to normalized
/// full-frame landmarks.
fn mesh_to_frame(raw: &[f32], roi: Rect, frame_w: f32, frame_h: f32) -> Option<FaceLandmarkFrame> {
    if raw.len() < MESH_POINTS * 3 {
        warn!(len = raw.len(), "Face mesh output too short");
        return None;
    }
    let sx = roi.width / MESH_INPUT as f32;
    let sy = roi.height / MESH_INPUT as f32;
    let points = raw
        .chunks_exact(3)
        .take(MESH_POINTS)
        .map(|p| ((roi.x + p[0] * sx) / frame_w, (roi.y + p[1] * sy) / frame_h));
    Some(FaceLandmarkFrame::from_points(points))
}
