use serde::{Deserialize, Serialize};

use crate::error::{TrackingError, TrackingResult};

/// MediaPipe face mesh index.
pub type LandmarkId = usize;

/// A single normalized point on a detected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: LandmarkId,
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(id: LandmarkId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    pub fn distance_to(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Landmarks for at most one face in one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarkFrame {
    pub landmarks: Vec<Landmark>,
}

impl FaceLandmarkFrame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Builds a frame from mesh output where the id is the position in the list.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let landmarks = points
            .into_iter()
            .enumerate()
            .map(|(id, (x, y))| Landmark::new(id, x, y))
            .collect();
        Self { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, id: LandmarkId) -> Option<&Landmark> {
        // Dense mesh output stores landmark `i` at position `i`.
        match self.landmarks.get(id) {
            Some(lm) if lm.id == id => Some(lm),
            _ => self.landmarks.iter().find(|lm| lm.id == id),
        }
    }

    pub fn require(&self, id: LandmarkId) -> TrackingResult<&Landmark> {
        self.get(id).ok_or(TrackingError::MissingLandmark { id })
    }

    /// Overwrites the position of `id`, appending it if absent.
    pub fn set(&mut self, id: LandmarkId, x: f32, y: f32) {
        match self.landmarks.iter_mut().find(|lm| lm.id == id) {
            Some(lm) => {
                lm.x = x;
                lm.y = y;
            }
            None => self.landmarks.push(Landmark::new(id, x, y)),
        }
    }
}

/// Integer pixel position of the on-screen pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pointer {
    pub x: i32,
    pub y: i32,
}

impl Pointer {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Pointer {
        Pointer::new(self.width / 2, self.height / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vertical {
    Up,
    Down,
}

impl Horizontal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Left => "Look Left",
            Self::Right => "Look Right",
        }
    }
}

impl Vertical {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Up => "Look Up",
            Self::Down => "Look Down",
        }
    }
}

/// Resolved look direction. There is no neutral value on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
}

impl Direction {
    pub fn new(horizontal: Horizontal, vertical: Vertical) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Axis-aligned rectangle in frame pixels (face detector ROI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Grows the rect by `ratio` of its size and clips it to `(0, 0, max_w, max_h)`.
    pub fn padded_within(&self, ratio: f32, max_w: f32, max_h: f32) -> Rect {
        let x = (self.x - self.width * ratio / 2.0).max(0.0);
        let y = (self.y - self.height * ratio / 2.0).max(0.0);
        let w = (self.width * (1.0 + ratio)).min(max_w - x);
        let h = (self.height * (1.0 + ratio)).min(max_h - y);
        Rect::new(x, y, w.max(0.0), h.max(0.0))
    }
}
