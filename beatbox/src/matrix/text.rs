//! Text rendering and the scrolling marquee.

use super::font::Font;
use super::framebuffer::{Framebuffer, Rgb};

/// Colours cycled per glyph by rainbow text.
pub const RAINBOW: [Rgb; 7] = [
    Rgb::RED,
    Rgb::YELLOW,
    Rgb::GREEN,
    Rgb::CYAN,
    Rgb::BLUE,
    Rgb::MAGENTA,
    Rgb::WHITE,
];

/// How text is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Solid(Rgb),
    /// Cycle [`RAINBOW`], one colour per character.
    Rainbow,
}

impl Ink {
    fn color(self, index: usize) -> Rgb {
        match self {
            Ink::Solid(c) => c,
            Ink::Rainbow => RAINBOW[index % RAINBOW.len()],
        }
    }
}

impl<const W: usize, const H: usize> Framebuffer<W, H> {
    /// Draw one character with its top-left corner at `(x, y)`. Returns
    /// `false` (drawing nothing) if the font has no glyph for `c`.
    pub fn draw_char(&mut self, x: i32, y: i32, c: char, font: Font, color: Rgb) -> bool {
        let Some(glyph) = font.glyph(c) else {
            return false;
        };
        for row in 0..font.height() {
            for col in 0..font.width() {
                if glyph.pixel(col, row) {
                    self.set_pixel(x + col, y + row, color);
                }
            }
        }
        true
    }

    /// Draw `text` left to right. Unsupported characters leave a gap.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, font: Font, color: Rgb) {
        self.draw_text_ink(x, y, text, font, Ink::Solid(color));
    }

    pub fn draw_text_rainbow(&mut self, x: i32, y: i32, text: &str, font: Font) {
        self.draw_text_ink(x, y, text, font, Ink::Rainbow);
    }

    pub fn draw_text_ink(&mut self, x: i32, y: i32, text: &str, font: Font, ink: Ink) {
        let mut cursor = x;
        for (i, c) in text.chars().enumerate() {
            self.draw_char(cursor, y, c, font, ink.color(i));
            cursor += font.advance();
        }
    }
}

/// Horizontally scrolling text.
///
/// Each [`frame`](Marquee::frame) clears the buffer, draws the text at the
/// current offset and moves it one pixel left. Once the text has fully left
/// the panel it restarts just off the right edge. The caller paces frames
/// and refreshes the panel in between.
#[derive(Debug, Clone)]
pub struct Marquee {
    /// `None` until the first frame, which starts at the panel's right edge.
    x: Option<i32>,
    y: i32,
    font: Font,
    ink: Ink,
}

impl Marquee {
    pub const fn new(y: i32, font: Font, ink: Ink) -> Self {
        Marquee {
            x: None,
            y,
            font,
            ink,
        }
    }

    /// Offset the next frame will be drawn at.
    pub fn offset(&self) -> Option<i32> {
        self.x
    }

    /// Render one frame of `text` into `fb`.
    pub fn frame<const W: usize, const H: usize>(&mut self, fb: &mut Framebuffer<W, H>, text: &str) {
        let start = W as i32;
        let x = *self.x.get_or_insert(start);
        fb.clear();
        fb.draw_text_ink(x, self.y, text, self.font, self.ink);

        // the last advance is only the inter-character gap
        let extent = self.font.text_width(text) - 1;
        let next = x - 1;
        self.x = Some(if next + extent <= 0 { start } else { next });
    }

    pub fn restart(&mut self) {
        self.x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Small = Framebuffer<16, 8>;

    #[test]
    fn text_uses_font_advance() {
        let mut fb = Small::new();
        fb.draw_text(0, 0, "11", Font::Small, Rgb::WHITE);
        // '1' has its stem in the middle column
        assert_eq!(fb.get(1, 0), Some(Rgb::WHITE));
        assert_eq!(fb.get(5, 0), Some(Rgb::WHITE));
        assert_eq!(fb.get(3, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let mut fb = Small::new();
        assert!(!fb.draw_char(0, 0, 'a', Font::Standard, Rgb::WHITE));
        fb.draw_text(0, 0, "?~", Font::Standard, Rgb::WHITE);
        assert!(fb.is_blank());

        // the gap still advances the cursor
        fb.draw_text(0, 0, "?!", Font::Standard, Rgb::WHITE);
        assert_eq!(fb.get(8, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn rainbow_cycles_per_character() {
        let mut fb = Framebuffer::<64, 8>::new();
        fb.draw_text_rainbow(0, 0, "!!!!!!!!", Font::Standard);
        for i in 0..8 {
            assert_eq!(fb.get(i * 6 + 2, 0), Some(RAINBOW[i as usize % 7]));
        }
    }

    #[test]
    fn marquee_scrolls_left_and_wraps() {
        let mut fb = Small::new();
        let mut m = Marquee::new(0, Font::Small, Ink::Solid(Rgb::GREEN));
        assert_eq!(m.offset(), None);

        m.frame(&mut fb, "I");
        // drawn at x = 16, fully off-panel
        assert!(fb.is_blank());
        assert_eq!(m.offset(), Some(15));

        m.frame(&mut fb, "I");
        assert_eq!(fb.get(15, 0), Some(Rgb::GREEN));

        // the glyph's right column is still on screen at x = -2
        for _ in 0..16 {
            m.frame(&mut fb, "I");
        }
        assert_eq!(m.offset(), Some(-2));
        m.frame(&mut fb, "I");
        assert_eq!(fb.get(0, 0), Some(Rgb::GREEN));
        assert_eq!(fb.get(1, 0), Some(Rgb::BLACK));
        // fully past the left edge: restart without a blank frame
        assert_eq!(m.offset(), Some(16));
    }
}
