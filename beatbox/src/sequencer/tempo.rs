//! Tempo arithmetic and tap-tempo detection.

use crate::constants::{MAX_BPM, MAX_TAPS, MAX_TAP_INTERVAL_US, MIN_BPM, TAP_FLASH_US};

const MICROS_PER_MINUTE: u64 = 60_000_000;

/// Bring any requested tempo into `MIN_BPM..=MAX_BPM`.
pub fn clamp_bpm(bpm: u16) -> u16 {
    // never divide by zero, even before the range clamp
    let bpm = if bpm == 0 { 1 } else { bpm };
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// Whole milliseconds between steps (truncating, as the 1 ms tick counts).
pub fn ms_per_step(bpm: u16, steps_per_beat: u32) -> u32 {
    let bpm = if bpm == 0 { 1 } else { bpm as u32 };
    60_000 / bpm / steps_per_beat
}

/// Microseconds between steps.
pub fn step_interval_us(bpm: u16, steps_per_beat: u32) -> u64 {
    let bpm = if bpm == 0 { 1 } else { bpm as u64 };
    MICROS_PER_MINUTE / bpm / steps_per_beat as u64
}

/// Tap-tempo detector.
///
/// Keeps the last [`MAX_TAPS`] tap times. A gap longer than
/// [`MAX_TAP_INTERVAL_US`] starts a fresh sequence. Every tap also starts a
/// short flash for the tempo indicator.
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    taps: heapless::Deque<u64, MAX_TAPS>,
    flash_started: Option<u64>,
}

impl TapTempo {
    pub const fn new() -> Self {
        TapTempo {
            taps: heapless::Deque::new(),
            flash_started: None,
        }
    }

    /// Register a tap at `now_us`.
    ///
    /// Returns the detected tempo, clamped to the valid range, once at least
    /// two taps are in the window; `None` otherwise.
    pub fn tap(&mut self, now_us: u64) -> Option<u16> {
        self.flash_started = Some(now_us);

        if let Some(&last) = self.taps.back() {
            if now_us.saturating_sub(last) > MAX_TAP_INTERVAL_US {
                self.taps.clear();
            }
        }
        if self.taps.is_full() {
            self.taps.pop_front();
        }
        // a slot was freed above
        let _ = self.taps.push_back(now_us);

        let count = self.taps.len() as u64;
        if count < 2 {
            return None;
        }
        let first = *self.taps.front()?;
        let last = *self.taps.back()?;
        let average = (last - first) / (count - 1);
        if average == 0 {
            return Some(MAX_BPM);
        }
        let bpm = (MICROS_PER_MINUTE / average).min(u16::MAX as u64) as u16;
        Some(clamp_bpm(bpm))
    }

    /// Taps currently in the averaging window.
    pub fn tap_count(&self) -> usize {
        self.taps.len()
    }

    /// Whether the tap indicator should be lit at `now_us`.
    pub fn is_flashing(&self, now_us: u64) -> bool {
        match self.flash_started {
            Some(start) => now_us.saturating_sub(start) < TAP_FLASH_US,
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.taps.clear();
        self.flash_started = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpm_is_clamped() {
        assert_eq!(clamp_bpm(0), MIN_BPM);
        assert_eq!(clamp_bpm(10_000), MAX_BPM);
        assert_eq!(clamp_bpm(128), 128);
    }

    #[test]
    fn step_lengths() {
        assert_eq!(ms_per_step(120, 4), 125);
        assert_eq!(ms_per_step(0, 4), 15_000);
        assert_eq!(step_interval_us(120, 1), 500_000);
        assert_eq!(step_interval_us(90, 4), 166_666);
    }

    #[test]
    fn single_tap_changes_nothing() {
        let mut t = TapTempo::new();
        assert_eq!(t.tap(1_000_000), None);
        assert_eq!(t.tap_count(), 1);
    }

    #[test]
    fn regular_taps_converge() {
        let mut t = TapTempo::new();
        let mut now = 10_000_000;
        let mut last = None;
        for _ in 0..6 {
            last = t.tap(now);
            now += 400_000;
        }
        assert_eq!(last, Some(150));
        assert_eq!(t.tap_count(), MAX_TAPS);
    }

    #[test]
    fn fast_and_slow_taps_are_clamped() {
        let mut t = TapTempo::new();
        t.tap(0);
        assert_eq!(t.tap(100_000), Some(MAX_BPM));

        let mut t = TapTempo::new();
        t.tap(0);
        assert_eq!(t.tap(1_900_000), Some(MIN_BPM));
    }

    #[test]
    fn long_gap_restarts_detection() {
        let mut t = TapTempo::new();
        t.tap(0);
        t.tap(500_000);
        assert_eq!(t.tap(3_000_000), None);
        assert_eq!(t.tap_count(), 1);
        assert_eq!(t.tap(3_250_000), Some(240));
    }

    #[test]
    fn window_slides_over_last_taps() {
        let mut t = TapTempo::new();
        // slow taps first, then faster ones push them out
        t.tap(0);
        t.tap(1_000_000);
        t.tap(1_500_000);
        t.tap(2_000_000);
        assert_eq!(t.tap(2_500_000), Some(120));
    }

    #[test]
    fn tap_flashes_briefly() {
        let mut t = TapTempo::new();
        assert!(!t.is_flashing(0));
        t.tap(5_000_000);
        assert!(t.is_flashing(5_050_000));
        assert!(!t.is_flashing(5_100_000));
    }
}
