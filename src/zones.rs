//! Command zones and pointer hit-testing.

use serde::{Deserialize, Serialize};

use crate::types::{Pointer, Viewport};

/// A rectangular command target.
///
/// The hit band is `[anchor_x, anchor_x + width]` horizontally and
/// `[anchor_y - margin_top, anchor_y + margin_bottom]` vertically. `height` is
/// the nominal button size and does not take part in hit-testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub label: String,
    pub anchor_x: i32,
    pub anchor_y: i32,
    pub width: i32,
    pub height: i32,
    pub margin_top: i32,
    pub margin_bottom: i32,
    pub color: [u8; 3],
}

impl Zone {
    pub const WIDTH: i32 = 120;
    pub const HEIGHT: i32 = 65;
    pub const MARGIN_TOP: i32 = 35;
    pub const MARGIN_BOTTOM: i32 = 10;

    pub fn new(id: &str, label: &str, anchor_x: i32, anchor_y: i32, color: [u8; 3]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            anchor_x,
            anchor_y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            margin_top: Self::MARGIN_TOP,
            margin_bottom: Self::MARGIN_BOTTOM,
            color,
        }
    }

    /// The four command zones placed at the viewport edges.
    pub fn default_layout(viewport: Viewport) -> Vec<Zone> {
        let (w, h) = (viewport.width, viewport.height);
        vec![
            Zone::new("left", "turn left", 10, h / 2, [0, 255, 0]),
            Zone::new("right", "turn right", w - 130, h / 2, [255, 0, 0]),
            Zone::new("up", "leg up", w / 2 - 50, 35, [0, 0, 200]),
            Zone::new("down", "leg down", w / 2 - 50, h - 15, [0, 255, 255]),
        ]
    }

    pub fn left(&self) -> i32 {
        self.anchor_x
    }

    pub fn right(&self) -> i32 {
        self.anchor_x.saturating_add(self.width)
    }

    pub fn top(&self) -> i32 {
        self.anchor_y.saturating_sub(self.margin_top)
    }

    pub fn bottom(&self) -> i32 {
        self.anchor_y.saturating_add(self.margin_bottom)
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, p: Pointer) -> bool {
        self.left() <= p.x && p.x <= self.right() && self.top() <= p.y && p.y <= self.bottom()
    }

    pub fn overlaps(&self, other: &Zone) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }
}

/// Tests the pointer against a fixed zone set. Stateless.
#[derive(Debug, Clone)]
pub struct HitTester {
    zones: Vec<Zone>,
}

impl HitTester {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// One flag per zone, in configuration order.
    pub fn hits(&self, pointer: Pointer) -> Vec<bool> {
        self.zones.iter().map(|z| z.contains(pointer)).collect()
    }

    pub fn inside_any(&self, pointer: Pointer) -> bool {
        self.zones.iter().any(|z| z.contains(pointer))
    }

    /// First zone containing the pointer, in configuration order.
    pub fn zone_at(&self, pointer: Pointer) -> Option<&Zone> {
        self.zones.iter().find(|z| z.contains(pointer))
    }
}
