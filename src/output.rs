use anyhow::{anyhow, Result};
use minifb::{Key, Window, WindowOptions};

/// Keys that end the session.
const QUIT_KEYS: [Key; 2] = [Key::Q, Key::Escape];

/// Display window. Also the source of the quit signal.
pub struct WindowOutput {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl WindowOutput {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("Failed to create window: {}", e))?;

        window.set_target_fps(60);

        Ok(Self {
            window,
            buffer: vec![0; width * height],
            width,
            height,
        })
    }

    /// Checked once per tick at the loop boundary.
    pub fn quit_requested(&self) -> bool {
        !self.window.is_open() || QUIT_KEYS.iter().any(|k| self.window.is_key_down(*k))
    }

    /// Processes window events without drawing, for ticks with no frame.
    pub fn pump(&mut self) {
        self.window.update();
    }

    /// Shows an RGB8 buffer of exactly `width * height` pixels.
    pub fn present(&mut self, rgb: &[u8]) -> Result<()> {
        pack_rgb(rgb, &mut self.buffer);
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| anyhow!("Window update failed: {}", e))
    }
}

/// RGB8 triples into minifb's 0RGB words.
fn pack_rgb(rgb: &[u8], out: &mut [u32]) {
    for (dst, px) in out.iter_mut().zip(rgb.chunks_exact(3)) {
        *dst = (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_rgb_into_0rgb() {
        let mut out = [0u32; 2];
        pack_rgb(&[0x12, 0x34, 0x56, 255, 0, 0], &mut out);
        assert_eq!(out, [0x0012_3456, 0x00FF_0000]);
    }
}
