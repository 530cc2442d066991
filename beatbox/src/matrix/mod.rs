//! LED matrix: framebuffer, drawing, fonts and HUB75 scan-out.

pub mod font;
pub mod framebuffer;
pub mod text;

#[cfg(feature = "hal")]
pub mod hub75;

pub use font::Font;
pub use framebuffer::{Framebuffer, PanelBuffer, Rgb};
pub use text::{Ink, Marquee, RAINBOW};

#[cfg(feature = "hal")]
pub use hub75::{Hub75, Hub75Pins, ScanMode};
