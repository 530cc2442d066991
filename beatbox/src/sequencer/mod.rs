//! Step sequencer: tracks, patterns, transport and tempo.
//!
//! The sequencer is a plain state machine. It never renders or plays audio
//! itself; each fired step is reported as a [`StepHits`] set that the
//! [`Engine`](crate::engine::Engine) turns into sound.

pub mod tempo;
pub mod track;

pub use tempo::{clamp_bpm, ms_per_step, step_interval_us, TapTempo};
pub use track::{Track, TrackName, FOUR_ON_THE_FLOOR, PATTERN_BITS};

use crate::constants::{DEFAULT_BPM, MAX_TRACKS};
use crate::synth::{PresetId, WaveParams, PRESETS};

/// Pattern length and subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Eight steps, one per beat (the LED grid).
    Eight,
    /// Sixteen steps, four per beat (one bar of 16ths).
    Sixteen,
}

impl StepMode {
    pub const fn steps(self) -> usize {
        match self {
            StepMode::Eight => 8,
            StepMode::Sixteen => 16,
        }
    }

    pub const fn steps_per_beat(self) -> u32 {
        match self {
            StepMode::Eight => 1,
            StepMode::Sixteen => 4,
        }
    }
}

/// The tracks that sound on one fired step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepHits {
    pub step: usize,
    /// Bit `n` set means track `n` sounds.
    pub tracks: u8,
}

impl StepHits {
    pub fn is_empty(&self) -> bool {
        self.tracks == 0
    }

    pub fn contains(&self, track: usize) -> bool {
        track < MAX_TRACKS && self.tracks & (1 << track) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        let mask = self.tracks;
        (0..MAX_TRACKS).filter(move |&t| mask & (1 << t) != 0)
    }
}

/// Transport, tempo and track state.
#[derive(Debug, Clone)]
pub struct Sequencer {
    tracks: [Track; MAX_TRACKS],
    mode: StepMode,
    playing: bool,
    current_step: usize,
    bpm: u16,
    ms_per_step: u32,
    step_interval_us: u64,
    /// Timestamp the transport last started at.
    started_at: u64,
    /// Timestamp the last step was due at.
    last_step_at: u64,
    ms_accum: u32,
    selected_track: usize,
    selected_step: usize,
    tap: TapTempo,
}

impl Sequencer {
    /// Power-up state: stopped at the default tempo, track `n` seeded from
    /// preset `n`, only the first track active with a four-on-the-floor
    /// pattern.
    pub fn new(mode: StepMode) -> Self {
        let tracks: [Track; MAX_TRACKS] = core::array::from_fn(|i| {
            Track::new(i, PresetId::new(i % PRESETS.len()).unwrap_or(PresetId::KICK))
        });
        let mut seq = Sequencer {
            tracks,
            mode,
            playing: false,
            current_step: 0,
            bpm: DEFAULT_BPM,
            ms_per_step: 0,
            step_interval_us: 0,
            started_at: 0,
            last_step_at: 0,
            ms_accum: 0,
            selected_track: 0,
            selected_step: 0,
            tap: TapTempo::new(),
        };
        seq.tracks[0].load_preset(PresetId::KICK);
        seq.tracks[0].set_pattern(FOUR_ON_THE_FLOOR);
        seq.update_step_timing();
        seq
    }

    // ── Transport ──────────────────────────────────────────────────────

    /// Start from step 0.
    pub fn play(&mut self, now_us: u64) {
        self.playing = true;
        self.current_step = 0;
        self.started_at = now_us;
        self.last_step_at = now_us;
        self.ms_accum = 0;
        info!("sequencer: play at {} bpm", self.bpm);
    }

    pub fn stop(&mut self) {
        self.playing = false;
        info!("sequencer: stop");
    }

    pub fn toggle_play(&mut self, now_us: u64) {
        if self.playing {
            self.stop();
        } else {
            self.play(now_us);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    /// The step that fires next.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Change the pattern length, wrapping positions into the new range.
    pub fn set_mode(&mut self, mode: StepMode) {
        self.mode = mode;
        self.current_step %= mode.steps();
        self.selected_step %= mode.steps();
        self.update_step_timing();
    }

    /// Poll with a microsecond timestamp. Fires at most one step per call.
    pub fn tick(&mut self, now_us: u64) -> Option<StepHits> {
        if !self.playing {
            return None;
        }
        let elapsed = now_us.saturating_sub(self.last_step_at);
        if elapsed < self.step_interval_us {
            return None;
        }
        // Keep the grid unless we fell more than a step behind.
        self.last_step_at = if elapsed < 2 * self.step_interval_us {
            self.last_step_at + self.step_interval_us
        } else {
            now_us
        };
        Some(self.fire())
    }

    /// Drive from a 1 kHz timer instead of timestamps.
    pub fn tick_1ms(&mut self) -> Option<StepHits> {
        if !self.playing {
            return None;
        }
        self.ms_accum += 1;
        if self.ms_accum < self.ms_per_step {
            return None;
        }
        self.ms_accum = 0;
        Some(self.fire())
    }

    fn fire(&mut self) -> StepHits {
        let step = self.current_step;
        let mut tracks = 0u8;
        for t in self.tracks.iter().filter(|t| t.is_active() && t.step(step)) {
            tracks |= 1 << t.id();
        }
        self.current_step = (step + 1) % self.mode.steps();
        trace!("sequencer: step {} hits {}", step, tracks);
        StepHits { step, tracks }
    }

    // ── Tempo ──────────────────────────────────────────────────────────

    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    pub fn ms_per_step(&self) -> u32 {
        self.ms_per_step
    }

    pub fn step_interval_us(&self) -> u64 {
        self.step_interval_us
    }

    /// Set the tempo, clamped to the valid range.
    pub fn set_bpm(&mut self, bpm: u16) {
        self.bpm = clamp_bpm(bpm);
        self.update_step_timing();
        debug!("sequencer: bpm {}", self.bpm);
    }

    /// Register a tempo tap. Returns `true` when the tempo changed.
    pub fn tap(&mut self, now_us: u64) -> bool {
        match self.tap.tap(now_us) {
            Some(bpm) => {
                self.set_bpm(bpm);
                true
            }
            None => false,
        }
    }

    /// Whether the tempo indicator is in its post-tap flash.
    pub fn is_flashing(&self, now_us: u64) -> bool {
        self.tap.is_flashing(now_us)
    }

    fn update_step_timing(&mut self) {
        let spb = self.mode.steps_per_beat();
        self.ms_per_step = ms_per_step(self.bpm, spb);
        self.step_interval_us = step_interval_us(self.bpm, spb);
    }

    // ── Tracks ─────────────────────────────────────────────────────────

    pub fn tracks(&self) -> &[Track; MAX_TRACKS] {
        &self.tracks
    }

    pub fn track(&self, id: usize) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn track_params_mut(&mut self, id: usize) -> Option<&mut WaveParams> {
        self.tracks.get_mut(id).map(Track::params_mut)
    }

    pub fn active_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_active()).count()
    }

    pub fn selected_track(&self) -> usize {
        self.selected_track
    }

    /// Move the selection to an active track. Inactive or unknown ids are ignored.
    pub fn select_track(&mut self, id: usize) -> bool {
        match self.tracks.get(id) {
            Some(t) if t.is_active() => {
                self.selected_track = id;
                true
            }
            _ => false,
        }
    }

    pub fn next_track(&mut self) {
        self.selected_track = self.find_active(self.selected_track, true);
    }

    pub fn prev_track(&mut self) {
        self.selected_track = self.find_active(self.selected_track, false);
    }

    /// Nearest active track after (or before) `start`, wrapping. Falls back
    /// to `start` if no other track is active.
    fn find_active(&self, start: usize, forward: bool) -> usize {
        (1..=MAX_TRACKS)
            .map(|i| {
                if forward {
                    (start + i) % MAX_TRACKS
                } else {
                    (start + MAX_TRACKS - i) % MAX_TRACKS
                }
            })
            .find(|&idx| self.tracks[idx].is_active())
            .unwrap_or(start)
    }

    /// Activate the first free slot with its bank voice and an empty
    /// pattern, and select it. `None` when all slots are in use.
    pub fn add_track(&mut self) -> Option<usize> {
        let Some(slot) = self.tracks.iter().position(|t| !t.is_active()) else {
            warn!("sequencer: all {} tracks in use", MAX_TRACKS);
            return None;
        };
        let preset = PresetId::new(slot % PRESETS.len()).unwrap_or(PresetId::KICK);
        let track = &mut self.tracks[slot];
        track.load_preset(preset);
        track.set_pattern(0);
        self.selected_track = slot;
        info!("sequencer: added track {}", slot);
        Some(slot)
    }

    /// Deactivate the selected track and move the selection to the next
    /// active one. Rejected when it is the last active track.
    pub fn delete_selected_track(&mut self) -> bool {
        if self.active_count() <= 1 {
            warn!("sequencer: refusing to delete the last track");
            return false;
        }
        let idx = self.selected_track;
        self.tracks[idx].deactivate();
        self.selected_track = self.find_active(idx, true);
        info!("sequencer: deleted track {}", idx);
        true
    }

    /// Load a bank voice into `track` and activate it.
    pub fn assign_preset(&mut self, track: usize, preset: PresetId) -> bool {
        let Some(t) = self.tracks.get_mut(track) else {
            return false;
        };
        t.load_preset(preset);
        debug!("sequencer: track {} <- preset {}", track, preset.index());
        true
    }

    /// Re-activate a slot without touching its voice.
    pub fn activate_track(&mut self, track: usize) -> bool {
        match self.tracks.get_mut(track) {
            Some(t) => {
                t.activate();
                true
            }
            None => false,
        }
    }

    /// Parameters of the selected track, or of the first active track if
    /// the selection somehow points at an inactive slot.
    pub fn selected_wave(&self) -> &WaveParams {
        let selected = &self.tracks[self.selected_track];
        if selected.is_active() {
            return selected.params();
        }
        self.tracks
            .iter()
            .find(|t| t.is_active())
            .unwrap_or(selected)
            .params()
    }

    pub fn selected_params_mut(&mut self) -> &mut WaveParams {
        self.tracks[self.selected_track].params_mut()
    }

    // ── Steps ──────────────────────────────────────────────────────────

    pub fn selected_step(&self) -> usize {
        self.selected_step
    }

    pub fn next_step(&mut self) {
        self.selected_step = (self.selected_step + 1) % self.mode.steps();
    }

    pub fn prev_step(&mut self) {
        let n = self.mode.steps();
        self.selected_step = (self.selected_step + n - 1) % n;
    }

    /// Flip one pattern bit of an active track. Returns `false` for unknown
    /// tracks, inactive tracks and steps past the pattern length.
    pub fn toggle_step(&mut self, track: usize, step: usize) -> bool {
        if step >= self.mode.steps() {
            return false;
        }
        match self.tracks.get_mut(track) {
            Some(t) if t.is_active() => {
                t.toggle_step(step);
                true
            }
            _ => false,
        }
    }

    pub fn toggle_selected_step(&mut self) -> bool {
        self.toggle_step(self.selected_track, self.selected_step)
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(StepMode::Sixteen)
    }
}
