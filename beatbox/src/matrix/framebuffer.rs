//! Retained-mode RGB framebuffer and drawing primitives.
//!
//! Coordinates are signed so shapes may be partly off-panel; every write
//! goes through [`Framebuffer::set_pixel`], which drops out-of-range pixels.

use crate::constants::{MATRIX_HEIGHT, MATRIX_WIDTH};

/// An 8-bit-per-channel colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Rgb::new(level, level, level)
    }

    pub const fn is_off(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

/// A `W`x`H` grid of pixels, row-major.
///
/// Written by drawing code and read by the scan-out driver. Both sides run
/// on one core; a scan that interleaves with a draw can show a half-drawn
/// frame but never reads out of bounds.
#[derive(Clone)]
pub struct Framebuffer<const W: usize, const H: usize> {
    pixels: [[Rgb; W]; H],
}

/// The 64x64 panel.
pub type PanelBuffer = Framebuffer<MATRIX_WIDTH, MATRIX_HEIGHT>;

impl<const W: usize, const H: usize> Framebuffer<W, H> {
    pub const fn new() -> Self {
        Framebuffer {
            pixels: [[Rgb::BLACK; W]; H],
        }
    }

    pub const fn width(&self) -> usize {
        W
    }

    pub const fn height(&self) -> usize {
        H
    }

    /// Pixel at `(x, y)`, or `None` off-panel.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        let (x, y) = Self::index(x, y)?;
        Some(self.pixels[y][x])
    }

    /// One row of pixels. Panics if `y >= H`.
    pub fn row(&self, y: usize) -> &[Rgb; W] {
        &self.pixels[y]
    }

    /// Write one pixel. Off-panel coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some((x, y)) = Self::index(x, y) {
            self.pixels[y][x] = color;
        }
    }

    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    pub fn fill(&mut self, color: Rgb) {
        for row in self.pixels.iter_mut() {
            row.fill(color);
        }
    }

    /// True when every pixel is black.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().flatten().all(|p| p.is_off())
    }

    /// One-pixel outline of a `w`x`h` rectangle.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        for i in 0..w {
            self.set_pixel(x + i, y, color);
            self.set_pixel(x + i, y + h - 1, color);
        }
        for j in 0..h {
            self.set_pixel(x, y + j, color);
            self.set_pixel(x + w - 1, y + j, color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        for j in 0..h.max(0) {
            for i in 0..w.max(0) {
                self.set_pixel(x + i, y + j, color);
            }
        }
    }

    /// Midpoint circle outline.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb) {
        if radius < 0 {
            return;
        }
        let (mut x, mut y) = (radius, 0);
        let mut decision = 1 - radius;
        while y <= x {
            for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
                self.set_pixel(cx + dx, cy + dy, color);
            }
            y += 1;
            if decision <= 0 {
                decision += 2 * y + 1;
            } else {
                x -= 1;
                decision += 2 * (y - x) + 1;
            }
        }
    }

    /// Midpoint circle filled with horizontal spans.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb) {
        if radius < 0 {
            return;
        }
        let (mut x, mut y) = (radius, 0);
        let mut decision = 1 - radius;
        while y <= x {
            self.hline(cx - x, cx + x, cy + y, color);
            self.hline(cx - x, cx + x, cy - y, color);
            self.hline(cx - y, cx + y, cy + x, color);
            self.hline(cx - y, cx + y, cy - x, color);
            y += 1;
            if decision <= 0 {
                decision += 2 * y + 1;
            } else {
                x -= 1;
                decision += 2 * (y - x) + 1;
            }
        }
    }

    fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Rgb) {
        for x in x0..=x1 {
            self.set_pixel(x, y, color);
        }
    }

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < W && y < H {
            Some((x, y))
        } else {
            None
        }
    }
}

impl<const W: usize, const H: usize> Default for Framebuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}
