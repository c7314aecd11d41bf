/// A tiny 3x5 bitmap font drawn straight into RGB8 buffers.
/// Case-insensitive; unknown characters render as a solid block.

const GLYPH_W: i32 = 3;
const GLYPH_H: i32 = 5;

// One row per entry, bit 2 is the leftmost column.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        'A' => [2, 5, 7, 5, 5],
        'B' => [6, 5, 6, 5, 6],
        'C' => [7, 4, 4, 4, 7],
        'D' => [6, 5, 5, 5, 6],
        'E' => [7, 4, 6, 4, 7],
        'F' => [7, 4, 6, 4, 4],
        'G' => [7, 4, 5, 5, 7],
        'H' => [5, 5, 7, 5, 5],
        'I' => [7, 2, 2, 2, 7],
        'J' => [1, 1, 1, 5, 7],
        'K' => [5, 5, 6, 5, 5],
        'L' => [4, 4, 4, 4, 7],
        'M' => [5, 7, 7, 5, 5],
        'N' => [6, 5, 5, 5, 5],
        'O' => [7, 5, 5, 5, 7],
        'P' => [7, 5, 7, 4, 4],
        'Q' => [7, 5, 5, 7, 1],
        'R' => [6, 5, 6, 5, 5],
        'S' => [7, 4, 7, 1, 7],
        'T' => [7, 2, 2, 2, 2],
        'U' => [5, 5, 5, 5, 7],
        'V' => [5, 5, 5, 5, 2],
        'W' => [5, 5, 7, 7, 5],
        'X' => [5, 5, 2, 5, 5],
        'Y' => [5, 5, 2, 2, 2],
        'Z' => [7, 1, 2, 4, 7],
        '0' => [7, 5, 5, 5, 7],
        '1' => [2, 6, 2, 2, 7],
        '2' => [7, 1, 7, 4, 7],
        '3' => [7, 1, 7, 1, 7],
        '4' => [5, 5, 7, 1, 1],
        '5' => [7, 4, 7, 1, 7],
        '6' => [7, 4, 7, 5, 7],
        '7' => [7, 1, 2, 4, 4],
        '8' => [7, 5, 7, 5, 7],
        '9' => [7, 5, 7, 1, 7],
        ' ' => [0, 0, 0, 0, 0],
        ':' => [0, 2, 0, 2, 0],
        '.' => [0, 0, 0, 0, 2],
        ',' => [0, 0, 0, 2, 4],
        '-' => [0, 0, 7, 0, 0],
        '/' => [1, 1, 2, 4, 4],
        '(' => [2, 4, 4, 4, 2],
        ')' => [2, 1, 1, 1, 2],
        '[' => [7, 4, 4, 4, 7],
        ']' => [7, 1, 1, 1, 7],
        _ => [7, 7, 7, 7, 7],
    }
}

/// Advance per character: glyph width plus one column of spacing.
pub fn char_advance(scale: usize) -> i32 {
    (GLYPH_W + 1) * scale as i32
}

pub fn text_width(text: &str, scale: usize) -> i32 {
    text.chars().count() as i32 * char_advance(scale)
}

pub fn text_height(scale: usize) -> i32 {
    GLYPH_H * scale as i32
}

/// Draws `text` with its top-left corner at `(x, y)`, clipped to the buffer.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    text: &str,
    color: [u8; 3],
    scale: usize,
) {
    let s = scale.max(1) as i32;
    for (i, c) in text.chars().enumerate() {
        let ox = x + i as i32 * char_advance(s as usize);
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_W {
                if (bits >> (GLYPH_W - 1 - col)) & 1 == 0 {
                    continue;
                }
                let px = ox + col * s;
                let py = y + row as i32 * s;
                fill(buffer, width, height, px, py, s, s, color);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill(buffer: &mut [u8], width: usize, height: usize, x: i32, y: i32, w: i32, h: i32, color: [u8; 3]) {
    for py in y.max(0)..(y + h).min(height as i32) {
        for px in x.max(0)..(x + w).min(width as i32) {
            let idx = (py as usize * width + px as usize) * 3;
            if let Some(dst) = buffer.get_mut(idx..idx + 3) {
                dst.copy_from_slice(&color);
            }
        }
    }
}
