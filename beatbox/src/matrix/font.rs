//! Fixed-width bitmap fonts.
//!
//! Both fonts cover space, `!`, digits and uppercase letters, in that order.
//! Other characters have no glyph and are skipped when drawing.

/// Glyph count: space, `!`, 10 digits, 26 letters.
const GLYPHS: usize = 38;

/// Glyph set selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 3x5 pixels, 4-pixel advance. Used by the sequencer screen.
    Small,
    /// 5x7 pixels, 6-pixel advance.
    Standard,
}

impl Font {
    pub const fn width(self) -> i32 {
        match self {
            Font::Small => 3,
            Font::Standard => 5,
        }
    }

    pub const fn height(self) -> i32 {
        match self {
            Font::Small => 5,
            Font::Standard => 7,
        }
    }

    /// Horizontal distance between glyph origins.
    pub const fn advance(self) -> i32 {
        self.width() + 1
    }

    /// Whether pixel (`col`, `row`) of `c`'s glyph is set. `None` when the
    /// font has no glyph for `c`.
    pub fn glyph(self, c: char) -> Option<Glyph> {
        glyph_index(c).map(|index| Glyph { font: self, index })
    }

    /// Width in pixels of `text` drawn in this font (every char advances,
    /// including those without a glyph).
    pub fn text_width(self, text: &str) -> i32 {
        text.chars().count() as i32 * self.advance()
    }
}

/// A drawable glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    font: Font,
    index: usize,
}

impl Glyph {
    pub fn pixel(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col >= self.font.width() || row >= self.font.height() {
            return false;
        }
        match self.font {
            // row-major, bit 2 is the leftmost column
            Font::Small => FONT_3X5[self.index][row as usize] & (1 << (2 - col)) != 0,
            // column-major, bit 0 is the top row
            Font::Standard => FONT_5X7[self.index][col as usize] & (1 << row) != 0,
        }
    }
}

fn glyph_index(c: char) -> Option<usize> {
    match c {
        ' ' => Some(0),
        '!' => Some(1),
        '0'..='9' => Some(2 + (c as usize - '0' as usize)),
        'A'..='Z' => Some(12 + (c as usize - 'A' as usize)),
        _ => None,
    }
}

#[rustfmt::skip]
static FONT_3X5: [[u8; 5]; GLYPHS] = [
    [0b000, 0b000, 0b000, 0b000, 0b000], // space
    [0b010, 0b010, 0b010, 0b000, 0b010], // !
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
    [0b111, 0b101, 0b111, 0b101, 0b101], // A
    [0b110, 0b101, 0b110, 0b101, 0b110], // B
    [0b111, 0b100, 0b100, 0b100, 0b111], // C
    [0b110, 0b101, 0b101, 0b101, 0b110], // D
    [0b111, 0b100, 0b111, 0b100, 0b111], // E
    [0b111, 0b100, 0b111, 0b100, 0b100], // F
    [0b111, 0b100, 0b101, 0b101, 0b111], // G
    [0b101, 0b101, 0b111, 0b101, 0b101], // H
    [0b111, 0b010, 0b010, 0b010, 0b111], // I
    [0b111, 0b001, 0b001, 0b101, 0b111], // J
    [0b101, 0b110, 0b100, 0b110, 0b101], // K
    [0b100, 0b100, 0b100, 0b100, 0b111], // L
    [0b101, 0b111, 0b111, 0b101, 0b101], // M
    [0b101, 0b111, 0b111, 0b111, 0b101], // N
    [0b111, 0b101, 0b101, 0b101, 0b111], // O
    [0b111, 0b101, 0b111, 0b100, 0b100], // P
    [0b111, 0b101, 0b101, 0b111, 0b001], // Q
    [0b111, 0b101, 0b111, 0b101, 0b101], // R
    [0b111, 0b100, 0b111, 0b001, 0b111], // S
    [0b111, 0b010, 0b010, 0b010, 0b010], // T
    [0b101, 0b101, 0b101, 0b101, 0b111], // U
    [0b101, 0b101, 0b101, 0b101, 0b010], // V
    [0b101, 0b101, 0b111, 0b111, 0b101], // W
    [0b101, 0b101, 0b010, 0b101, 0b101], // X
    [0b101, 0b101, 0b010, 0b010, 0b010], // Y
    [0b111, 0b001, 0b010, 0b100, 0b111], // Z
];

#[rustfmt::skip]
static FONT_5X7: [[u8; 5]; GLYPHS] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x26, 0x49, 0x49, 0x49, 0x32], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
];
