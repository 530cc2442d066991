//! The "BEAT BOX" screen: cursor navigation and rendering.
//!
//! Layout on the 64x64 panel, top to bottom: title, a BPM box (select to tap
//! tempo) and a PLAY/STOP box, then one row per track with a numbered label
//! and eight beat cells. Selecting a track label opens a strip of four
//! waveform icons along the bottom edge; selecting an icon loads that voice
//! into the track.
//!
//! [`Ui`] only holds cursor state. Tempo, patterns and voices live in the
//! [`Sequencer`], and the screen is redrawn from scratch on every
//! [`render`](Ui::render).

use crate::constants::MAX_TRACKS;
use crate::input::{Button, Press};
use crate::matrix::{Font, Framebuffer, Rgb};
use crate::sequencer::Sequencer;
use crate::synth::PresetId;

/// Beat cells per track row.
pub const NUM_BEATS: usize = 8;

/// Vertical offset applied to the whole layout.
pub const UI_Y_OFFSET: i32 = 5;

/// Voices offered by the preset strip, left to right.
pub const PICKER_PRESETS: [PresetId; 4] = [
    PresetId::PURE_SINE,
    PresetId::PURE_TRIANGLE,
    PresetId::PURE_SQUARE,
    PresetId::PURE_NOISE,
];

pub const PICKER_LABELS: [&str; 4] = ["SIN", "TRI", "SQR", "NOI"];

const TITLE: &str = "BEAT BOX";

const BPM_BOX: (i32, i32, i32, i32) = (4, 9 + UI_Y_OFFSET, 13, 7);
const PLAY_BOX: (i32, i32, i32, i32) = (41, 9 + UI_Y_OFFSET, 17, 7);

const LABEL_X: i32 = 5;
const LABEL_Y: i32 = 19 + UI_Y_OFFSET;
const LABEL_SIZE: i32 = 7;
/// Vertical pitch of track rows.
const ROW_PITCH: i32 = 9;

const GRID_X: i32 = 14;
const GRID_Y: i32 = 20 + UI_Y_OFFSET;
const CELL: i32 = 4;
const CELL_PITCH: i32 = 6;

const STRIP_X: i32 = 4;
const STRIP_Y: i32 = 56 + UI_Y_OFFSET;
const STRIP_PITCH: i32 = 14;

const CURSOR: Rgb = Rgb::BLUE;
const CELL_OUTLINE: Rgb = Rgb::gray(200);
const ICON_IDLE: Rgb = Rgb::gray(80);

/// Where the cursor sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Bpm,
    Play,
    TrackLabel { track: usize },
    Beat { track: usize, beat: usize },
}

/// Open preset strip for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetPicker {
    pub track: usize,
    /// Index into [`PICKER_PRESETS`].
    pub cursor: usize,
}

/// What a button press changed outside the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// The transport was started or stopped.
    TransportToggled,
    /// A tap was registered; carries whether the tempo changed.
    Tapped { tempo_changed: bool },
    /// A beat cell was flipped.
    StepToggled { track: usize, beat: usize },
    /// A voice was loaded into a track.
    PresetAssigned { track: usize },
    /// The edited track changed.
    TrackSelected { track: usize },
}

/// Cursor state of the sequencer screen.
#[derive(Debug, Clone)]
pub struct Ui {
    focus: Focus,
    picker: Option<PresetPicker>,
}

impl Ui {
    pub const fn new() -> Self {
        Ui {
            focus: Focus::TrackLabel { track: 0 },
            picker: None,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn picker(&self) -> Option<PresetPicker> {
        self.picker
    }

    /// Apply one debounced press.
    pub fn handle(
        &mut self,
        button: Button,
        press: Press,
        seq: &mut Sequencer,
        now_us: u64,
    ) -> Option<UiAction> {
        match press {
            Press::Short => self.short_press(button, seq, now_us),
            Press::Long => self.long_press(seq),
        }
    }

    fn short_press(&mut self, button: Button, seq: &mut Sequencer, now_us: u64) -> Option<UiAction> {
        if let Some(picker) = self.picker.as_mut() {
            match button {
                Button::Left => picker.cursor = picker.cursor.saturating_sub(1),
                Button::Right => picker.cursor = (picker.cursor + 1).min(PICKER_PRESETS.len() - 1),
                Button::Select => return self.confirm_preset(seq),
                Button::Up | Button::Down => {}
            }
            return None;
        }

        match button {
            Button::Up => {
                self.focus = match self.focus {
                    Focus::TrackLabel { track } if track > 0 => Focus::TrackLabel { track: track - 1 },
                    Focus::Beat { track, beat } if track > 0 => Focus::Beat { track: track - 1, beat },
                    Focus::Beat { beat, .. } if beat >= NUM_BEATS / 2 => Focus::Play,
                    Focus::Beat { .. } | Focus::TrackLabel { .. } => Focus::Bpm,
                    other => other,
                };
                None
            }
            Button::Down => {
                self.focus = match self.focus {
                    Focus::Bpm | Focus::Play => Focus::TrackLabel { track: 0 },
                    Focus::TrackLabel { track } => Focus::TrackLabel {
                        track: (track + 1).min(MAX_TRACKS - 1),
                    },
                    Focus::Beat { track, beat } => Focus::Beat {
                        track: (track + 1).min(MAX_TRACKS - 1),
                        beat,
                    },
                };
                None
            }
            Button::Left => {
                self.focus = match self.focus {
                    Focus::Play => Focus::Bpm,
                    Focus::Beat { track, beat: 0 } => Focus::TrackLabel { track },
                    Focus::Beat { track, beat } => Focus::Beat { track, beat: beat - 1 },
                    other => other,
                };
                None
            }
            Button::Right => {
                self.focus = match self.focus {
                    Focus::Bpm => Focus::Play,
                    Focus::TrackLabel { track } => Focus::Beat { track, beat: 0 },
                    Focus::Beat { track, beat } => Focus::Beat {
                        track,
                        beat: (beat + 1).min(NUM_BEATS - 1),
                    },
                    Focus::Play => Focus::Play,
                };
                None
            }
            Button::Select => self.select(seq, now_us),
        }
    }

    fn select(&mut self, seq: &mut Sequencer, now_us: u64) -> Option<UiAction> {
        match self.focus {
            Focus::Bpm => Some(UiAction::Tapped {
                tempo_changed: seq.tap(now_us),
            }),
            Focus::Play => {
                seq.toggle_play(now_us);
                Some(UiAction::TransportToggled)
            }
            Focus::TrackLabel { track } => {
                let cursor = seq
                    .track(track)
                    .filter(|t| t.is_active())
                    .and_then(|t| t.preset())
                    .and_then(|p| PICKER_PRESETS.iter().position(|&q| q == p))
                    .unwrap_or(0);
                self.picker = Some(PresetPicker { track, cursor });
                None
            }
            Focus::Beat { track, beat } => seq
                .toggle_step(track, beat)
                .then_some(UiAction::StepToggled { track, beat }),
        }
    }

    fn confirm_preset(&mut self, seq: &mut Sequencer) -> Option<UiAction> {
        let picker = self.picker.take()?;
        let preset = PICKER_PRESETS[picker.cursor];
        if !seq.assign_preset(picker.track, preset) {
            return None;
        }
        // Adopt the track if the selection sits on an empty slot.
        let selected = seq.selected_track();
        if !seq.track(selected).is_some_and(|t| t.is_active()) {
            seq.select_track(picker.track);
        }
        Some(UiAction::PresetAssigned {
            track: picker.track,
        })
    }

    /// A long press on any button makes the track under the cursor the
    /// edited one, if it has a voice.
    fn long_press(&mut self, seq: &mut Sequencer) -> Option<UiAction> {
        if self.picker.is_some() {
            return None;
        }
        let track = match self.focus {
            Focus::TrackLabel { track } | Focus::Beat { track, .. } => track,
            Focus::Bpm | Focus::Play => return None,
        };
        if track == seq.selected_track() || !seq.select_track(track) {
            return None;
        }
        Some(UiAction::TrackSelected { track })
    }

    // ── Rendering ──────────────────────────────────────────────────────

    /// Redraw the whole screen.
    pub fn render<const W: usize, const H: usize>(
        &self,
        fb: &mut Framebuffer<W, H>,
        seq: &Sequencer,
        now_us: u64,
    ) {
        fb.clear();

        let title_x = (W as i32 - Font::Small.text_width(TITLE)) / 2;
        fb.draw_text(title_x, 2 + UI_Y_OFFSET, TITLE, Font::Small, Rgb::YELLOW);

        self.draw_bpm(fb, seq, now_us);
        self.draw_play(fb, seq);
        for track in 0..MAX_TRACKS {
            self.draw_track_label(fb, seq, track);
            for beat in 0..NUM_BEATS {
                self.draw_beat_cell(fb, seq, track, beat);
            }
        }
        if let Some(picker) = self.picker {
            draw_preset_strip(fb, picker.cursor);
        }
    }

    fn draw_bpm<const W: usize, const H: usize>(
        &self,
        fb: &mut Framebuffer<W, H>,
        seq: &Sequencer,
        now_us: u64,
    ) {
        let (x, y, w, h) = BPM_BOX;
        if self.focus == Focus::Bpm {
            fb.draw_rect(x - 1, y - 1, w + 2, h + 2, CURSOR);
        }
        fb.fill_rect(x, y, w, h, Rgb::BLACK);
        let color = if seq.is_flashing(now_us) {
            Rgb::RED
        } else {
            Rgb::CYAN
        };
        let bpm = seq.bpm();
        let digits = [bpm / 100 % 10, bpm / 10 % 10, bpm % 10];
        for (i, d) in digits.into_iter().enumerate() {
            let c = char::from(b'0' + d as u8);
            fb.draw_char(x + 1 + i as i32 * Font::Small.advance(), y + 1, c, Font::Small, color);
        }
    }

    fn draw_play<const W: usize, const H: usize>(&self, fb: &mut Framebuffer<W, H>, seq: &Sequencer) {
        let (x, y, w, h) = PLAY_BOX;
        if self.focus == Focus::Play {
            fb.draw_rect(x - 1, y - 1, w + 2, h + 2, CURSOR);
        }
        fb.fill_rect(x, y, w, h, Rgb::BLACK);
        if seq.is_playing() {
            fb.draw_text(x + 1, y + 1, "STOP", Font::Small, Rgb::RED);
        } else {
            fb.draw_text(x + 1, y + 1, "PLAY", Font::Small, Rgb::GREEN);
        }
    }

    fn draw_track_label<const W: usize, const H: usize>(
        &self,
        fb: &mut Framebuffer<W, H>,
        seq: &Sequencer,
        track: usize,
    ) {
        let y = LABEL_Y + track as i32 * ROW_PITCH;
        if self.focus == (Focus::TrackLabel { track }) {
            fb.draw_rect(LABEL_X - 1, y - 1, LABEL_SIZE + 2, LABEL_SIZE + 2, CURSOR);
        }

        let has_voice = seq.track(track).is_some_and(|t| t.is_active());
        let (background, ink) = match (has_voice, track == seq.selected_track()) {
            (true, true) => (Rgb::RED, Rgb::WHITE),
            (true, false) => (Rgb::WHITE, Rgb::BLACK),
            (false, _) => (Rgb::BLACK, Rgb::WHITE),
        };
        fb.fill_rect(LABEL_X, y, LABEL_SIZE, LABEL_SIZE, background);
        let digit = char::from(b'1' + track as u8);
        fb.draw_char(LABEL_X + 2, y + 1, digit, Font::Small, ink);
    }

    fn draw_beat_cell<const W: usize, const H: usize>(
        &self,
        fb: &mut Framebuffer<W, H>,
        seq: &Sequencer,
        track: usize,
        beat: usize,
    ) {
        let x = GRID_X + beat as i32 * CELL_PITCH;
        let y = GRID_Y + track as i32 * ROW_PITCH;

        let outline = if self.focus == (Focus::Beat { track, beat }) {
            CURSOR
        } else if seq.is_playing() && seq.current_step() == beat {
            Rgb::YELLOW
        } else {
            CELL_OUTLINE
        };
        fb.draw_rect(x, y, CELL, CELL, outline);

        let filled = seq.track(track).is_some_and(|t| t.is_active() && t.step(beat));
        let fill = if filled { Rgb::YELLOW } else { Rgb::BLACK };
        fb.fill_rect(x + 1, y + 1, CELL - 2, CELL - 2, fill);
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_preset_strip<const W: usize, const H: usize>(fb: &mut Framebuffer<W, H>, cursor: usize) {
    for (i, icon) in WAVE_ICONS.iter().enumerate() {
        let x = STRIP_X + i as i32 * STRIP_PITCH;
        let color = if i == cursor { CURSOR } else { ICON_IDLE };
        for &(dx, dy) in icon.iter() {
            fb.set_pixel(x + dx, STRIP_Y + dy, color);
        }
    }
}

/// 9x5 pixel waveform icons, in [`PICKER_PRESETS`] order.
#[rustfmt::skip]
const WAVE_ICONS: [[(i32, i32); 9]; 4] = [
    // sine
    [(0, 2), (1, 1), (2, 0), (3, 1), (4, 2), (5, 3), (6, 4), (7, 3), (8, 2)],
    // triangle
    [(0, 4), (1, 3), (2, 2), (3, 1), (4, 0), (5, 1), (6, 2), (7, 3), (8, 4)],
    // square
    [(0, 0), (1, 0), (2, 0), (3, 0), (4, 4), (5, 4), (6, 4), (7, 4), (8, 0)],
    // noise
    [(0, 1), (1, 3), (2, 0), (3, 4), (4, 2), (5, 0), (6, 3), (7, 1), (8, 4)],
];
