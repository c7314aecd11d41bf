//! Draws one tick's state on top of the camera image.

use image::{imageops::FilterType, RgbImage};

use crate::config::{parse_hex, UiConfig};
use crate::font;
use crate::session::TickOutput;
use crate::types::Viewport;
use crate::zones::Zone;

const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const SELECTED_COLOR: [u8; 3] = [0, 255, 255];

/// RGB8 canvas of viewport size.
pub struct Canvas {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Canvas {
    pub fn blank(viewport: Viewport) -> Self {
        let (width, height) = (viewport.width.max(1) as usize, viewport.height.max(1) as usize);
        Self {
            pixels: vec![0; width * height * 3],
            width,
            height,
        }
    }

    /// The camera frame stretched to the viewport.
    pub fn from_frame(frame: &RgbImage, viewport: Viewport) -> Self {
        let (width, height) = (viewport.width.max(1) as u32, viewport.height.max(1) as u32);
        let pixels = if frame.dimensions() == (width, height) {
            frame.as_raw().clone()
        } else {
            image::imageops::resize(frame, width, height, FilterType::Triangle).into_raw()
        };
        Self {
            pixels,
            width: width as usize,
            height: height as usize,
        }
    }

    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 3]) {
        let (w, h) = (self.width as i32, self.height as i32);
        for y in y0.max(0)..=y1.min(h - 1) {
            for x in x0.max(0)..=x1.min(w - 1) {
                self.put(x, y, color);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Text whose baseline sits at `y`.
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: [u8; 3], scale: usize) {
        let top = y - font::text_height(scale);
        font::draw_text(&mut self.pixels, self.width, self.height, x, top, text, color, scale);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        let idx = self.index(x, y)?;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    fn put(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + 3].copy_from_slice(&color);
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((y as usize * self.width + x as usize) * 3)
    }
}

pub fn draw_zones(canvas: &mut Canvas, zones: &[Zone], scale: usize) {
    for zone in zones {
        canvas.fill_rect(zone.left(), zone.top(), zone.right(), zone.bottom(), zone.color);
        canvas.text(zone.anchor_x + 5, zone.anchor_y, &zone.label, TEXT_COLOR, scale);
    }
}

/// Zones always; direction labels and pointer only on tracked ticks;
/// the selection banner once latched.
pub fn draw_tick(canvas: &mut Canvas, tick: &TickOutput, zones: &[Zone], ui: &UiConfig) {
    draw_zones(canvas, zones, ui.text_scale);

    if let Some(face) = &tick.face {
        canvas.text(10, 30, &face.horizontal_label, TEXT_COLOR, ui.text_scale);
        canvas.text(10, 60, &face.vertical_label, TEXT_COLOR, ui.text_scale);
        canvas.fill_circle(
            tick.pointer.x,
            tick.pointer.y,
            ui.pointer_radius,
            parse_hex(&ui.pointer_color_hex),
        );
    }

    if tick.selected {
        let (w, h) = (canvas.width as i32, canvas.height as i32);
        canvas.text(w / 2 - 105, h / 2, "SELECTED", SELECTED_COLOR, ui.text_scale + 1);
    }
}
