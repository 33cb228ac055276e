pub type Color = [u8; 4];

pub const BLACK: Color = [0, 0, 0, 255];
pub const WHITE: Color = [255, 255, 255, 255];

// 3x5 block font, uppercase only.
pub const DEFAULT_TEXT_SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    n.saturating_mul((GLYPH_W + 1) * scale.max(1))
}

pub fn text_height(scale: u32) -> u32 {
    GLYPH_H * scale.max(1)
}

/// CPU drawing surface over an RGBA8 frame buffer (row-major, 4 bytes per pixel).
///
/// All primitives clip against the frame; out-of-range rects are silently dropped.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    /// Returns `None` when the buffer is too small for `width * height` pixels.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Option<Self> {
        let needed = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if frame.len() < needed {
            return None;
        }
        Some(Self {
            frame,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(px)
    }

    pub fn clear(&mut self, color: Color) {
        self.fill_rect(Rect::new(0, 0, self.width, self.height), color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.for_each_pixel(rect, |px| px.copy_from_slice(&color));
    }

    /// Blends `color` over existing content with the given opacity.
    pub fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        match alpha {
            0 => {}
            255 => self.fill_rect(rect, color),
            _ => {
                let a = alpha as u32;
                let inv = 255 - a;
                self.for_each_pixel(rect, |px| {
                    for c in 0..3 {
                        px[c] = ((px[c] as u32 * inv + color[c] as u32 * a + 127) / 255) as u8;
                    }
                    px[3] = 255;
                });
            }
        }
    }

    /// Border of `thickness` pixels drawn inside `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: u32) {
        self.stroke_with(rect, thickness, |canvas, edge| canvas.fill_rect(edge, color));
    }

    pub fn blend_stroke_rect(&mut self, rect: Rect, color: Color, thickness: u32, alpha: u8) {
        self.stroke_with(rect, thickness, |canvas, edge| {
            canvas.blend_rect(edge, color, alpha)
        });
    }

    pub fn hline(&mut self, x: u32, y: u32, w: u32, color: Color) {
        self.fill_rect(Rect::new(x, y, w, 1), color);
    }

    pub fn vline(&mut self, x: u32, y: u32, h: u32, color: Color) {
        self.fill_rect(Rect::new(x, y, 1, h), color);
    }

    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    pub fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let scale = scale.max(1);
        let mut cursor = x;
        for ch in text.chars() {
            if cursor >= self.width {
                break;
            }
            if ch != ' ' {
                for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
                    for col in 0..GLYPH_W {
                        if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                            continue;
                        }
                        let px = cursor + col * scale;
                        let py = y + row as u32 * scale;
                        self.fill_rect(Rect::new(px, py, scale, scale), color);
                    }
                }
            }
            cursor = cursor.saturating_add((GLYPH_W + 1) * scale);
        }
    }

    fn stroke_with(&mut self, rect: Rect, thickness: u32, mut draw: impl FnMut(&mut Self, Rect)) {
        if rect.w == 0 || rect.h == 0 || thickness == 0 {
            return;
        }
        let t = thickness.min(rect.w / 2 + 1).min(rect.h / 2 + 1);
        draw(self, Rect::new(rect.x, rect.y, rect.w, t));
        draw(self, Rect::new(rect.x, rect.bottom() - t, rect.w, t));
        let inner_h = rect.h.saturating_sub(2 * t);
        if inner_h > 0 {
            draw(self, Rect::new(rect.x, rect.y + t, t, inner_h));
            draw(self, Rect::new(rect.right() - t, rect.y + t, t, inner_h));
        }
    }

    fn for_each_pixel(&mut self, rect: Rect, mut f: impl FnMut(&mut [u8])) {
        let max_x = rect.right().min(self.width);
        let max_y = rect.bottom().min(self.height);
        if rect.x >= max_x || rect.y >= max_y {
            return;
        }
        for y in rect.y..max_y {
            let start = self.index(rect.x, y);
            let end = self.index(max_x, y);
            for px in self.frame[start..end].chunks_exact_mut(4) {
                f(px);
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        _ => [0b111, 0b001, 0b010, 0b000, 0b010],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: u32, h: u32) -> Vec<u8> {
        vec![0u8; (w * h * 4) as usize]
    }

    #[test]
    fn canvas_rejects_short_buffer() {
        let mut buf = vec![0u8; 15];
        assert!(Canvas::new(&mut buf, 2, 2).is_none());
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut buf = frame(4, 4);
        let mut canvas = Canvas::new(&mut buf, 4, 4).unwrap();
        canvas.fill_rect(Rect::new(2, 2, 10, 10), WHITE);
        assert_eq!(canvas.pixel(3, 3), Some(WHITE));
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(4, 4), None);
    }

    #[test]
    fn blend_rect_mixes_with_background() {
        let mut buf = frame(1, 1);
        let mut canvas = Canvas::new(&mut buf, 1, 1).unwrap();
        canvas.clear(BLACK);
        canvas.blend_rect(Rect::new(0, 0, 1, 1), WHITE, 128);
        let px = canvas.pixel(0, 0).unwrap();
        assert_eq!(px, [128, 128, 128, 255]);
    }

    #[test]
    fn stroke_rect_leaves_interior_untouched() {
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10).unwrap();
        canvas.stroke_rect(Rect::new(0, 0, 10, 10), WHITE, 2);
        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
        assert_eq!(canvas.pixel(1, 5), Some(WHITE));
        assert_eq!(canvas.pixel(8, 9), Some(WHITE));
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn text_draws_glyph_pixels() {
        let mut buf = frame(20, 10);
        let mut canvas = Canvas::new(&mut buf, 20, 10).unwrap();
        canvas.draw_text_scaled(0, 0, "1", WHITE, 1);
        // '1' has its stem in the middle column.
        assert_eq!(canvas.pixel(1, 0), Some(WHITE));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(text_width("AB", 1), 8);
    }
}
