//! A sequencer track: one voice plus its step pattern.

use core::fmt::Write;

use crate::synth::{PresetId, WaveParams};

/// Display name storage ("Track 1", "KICK", ...).
pub type TrackName = heapless::String<12>;

/// Highest step index a pattern can hold.
pub const PATTERN_BITS: usize = 16;

/// Pattern loaded into the first track at power-up: a hit on every beat.
pub const FOUR_ON_THE_FLOOR: u16 = 0b1000_1000_1000_1000;

#[derive(Debug, Clone)]
pub struct Track {
    id: usize,
    active: bool,
    name: TrackName,
    params: WaveParams,
    /// Bank voice the parameters were last loaded from.
    preset: Option<PresetId>,
    /// Bit `n` set means the track sounds on step `n`.
    pattern: u16,
}

impl Track {
    /// An inactive track in slot `id`, seeded with `preset`'s voice.
    pub fn new(id: usize, preset: PresetId) -> Self {
        let mut name = TrackName::new();
        // "Track NN" always fits in 12 bytes
        let _ = write!(name, "Track {}", id + 1);
        Track {
            id,
            active: false,
            name,
            params: preset.params(),
            preset: None,
            pattern: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut WaveParams {
        &mut self.params
    }

    pub fn preset(&self) -> Option<PresetId> {
        self.preset
    }

    pub fn pattern(&self) -> u16 {
        self.pattern
    }

    pub fn set_pattern(&mut self, pattern: u16) {
        self.pattern = pattern;
    }

    /// Whether the track sounds on `step`. Out-of-range steps are never set.
    pub fn step(&self, step: usize) -> bool {
        step < PATTERN_BITS && (self.pattern >> step) & 1 != 0
    }

    /// Flip one pattern bit. Out-of-range steps are ignored.
    pub fn toggle_step(&mut self, step: usize) {
        if step < PATTERN_BITS {
            self.pattern ^= 1 << step;
        }
    }

    /// Copy `preset`'s voice into this slot and activate it.
    pub fn load_preset(&mut self, preset: PresetId) {
        self.params = preset.params();
        self.preset = Some(preset);
        self.active = true;
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    /// Deactivate and clear the pattern. Parameters are kept for reuse.
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.pattern = 0;
    }
}
