//! Button debouncing and press classification.

use crate::constants::{DEBOUNCE_US, LONG_PRESS_US};

/// A completed press, reported on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    /// Released before [`LONG_PRESS_US`].
    Short,
    /// Held for at least [`LONG_PRESS_US`].
    Long,
}

/// Debounce state for one button.
///
/// The raw level must hold for [`DEBOUNCE_US`] before it becomes the stable
/// level. A stable release reports a [`Press`] classified by how long the
/// button was stably held.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    last_raw: bool,
    stable: bool,
    last_change: u64,
    press_start: u64,
}

impl Debouncer {
    pub const fn new() -> Self {
        Debouncer {
            last_raw: false,
            stable: false,
            last_change: 0,
            press_start: 0,
        }
    }

    /// Record an edge seen by an interrupt; restarts the settle window.
    pub fn note_edge(&mut self, at_us: u64) {
        self.last_change = at_us;
    }

    /// Feed the current raw level (`true` = pressed).
    pub fn update(&mut self, pressed: bool, now_us: u64) -> Option<Press> {
        if pressed != self.last_raw {
            self.last_raw = pressed;
            self.last_change = now_us;
        }
        if now_us.saturating_sub(self.last_change) < DEBOUNCE_US {
            return None;
        }
        if pressed == self.stable {
            return None;
        }

        self.stable = pressed;
        if pressed {
            self.press_start = now_us;
            return None;
        }
        if now_us.saturating_sub(self.press_start) >= LONG_PRESS_US {
            Some(Press::Long)
        } else {
            Some(Press::Short)
        }
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hold `level` from `from` to `to` (inclusive), polling every millisecond.
    fn hold(d: &mut Debouncer, level: bool, from: u64, to: u64) -> Option<Press> {
        let mut result = None;
        let mut t = from;
        while t <= to {
            if let Some(p) = d.update(level, t) {
                assert!(result.is_none(), "two presses reported");
                result = Some(p);
            }
            t += 1_000;
        }
        result
    }

    #[test]
    fn short_press() {
        let mut d = Debouncer::new();
        assert_eq!(hold(&mut d, true, 1_000_000, 1_100_000), None);
        assert!(d.is_pressed());
        assert_eq!(hold(&mut d, false, 1_101_000, 1_200_000), Some(Press::Short));
        assert!(!d.is_pressed());
    }

    #[test]
    fn long_press() {
        let mut d = Debouncer::new();
        hold(&mut d, true, 1_000_000, 1_600_000);
        assert_eq!(hold(&mut d, false, 1_601_000, 1_700_000), Some(Press::Long));
    }

    #[test]
    fn bounces_are_filtered() {
        let mut d = Debouncer::new();
        // chatter every 2 ms never settles
        let mut t = 1_000_000;
        for i in 0..20 {
            assert_eq!(d.update(i % 2 == 0, t), None);
            t += 2_000;
        }
        assert!(!d.is_pressed());
    }

    #[test]
    fn edge_restarts_settle_window() {
        let mut d = Debouncer::new();
        d.update(true, 1_000_000);
        d.note_edge(1_010_000);
        assert_eq!(d.update(true, 1_016_000), None);
        assert!(!d.is_pressed());
        d.update(true, 1_025_000);
        assert!(d.is_pressed());
    }
}
