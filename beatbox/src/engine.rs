//! The sequencer, knob, synth, mixer and audio output wired together.
//!
//! [`Engine`] is what the main loop drives: feed it time (timestamps or a
//! 1 kHz tick), button presses and knob readings. Whenever the sequencer
//! fires a step with hits, every hit track is rendered, the renders are
//! averaged, and the mix is handed to the [`AudioSink`]. A step that lands
//! while the previous mix is still playing is dropped.

use crate::audio::{AudioSink, PlaybackError};
use crate::control::{ControlSurface, ParamId};
use crate::input::{Button, Press};
use crate::mixer::Mixer;
use crate::sequencer::{Sequencer, StepHits, StepMode};
use crate::synth::{PresetId, Synth, WaveParams};
use crate::ui::{Ui, UiAction};

/// The sample-sized state of an [`Engine`]: synth caches, mix accumulators
/// and the per-track render buffer.
///
/// At `MAX_SAMPLES` this is roughly 256 KiB. `new` is `const`, so it is
/// meant to live in a `static` or an RTIC `local` resource and be lent to
/// the engine.
pub struct VoiceBuffers<const N: usize> {
    synth: Synth<N>,
    mixer: Mixer<N>,
    /// Render target for one track before it is mixed.
    scratch: [u16; N],
}

impl<const N: usize> VoiceBuffers<N> {
    /// `seed` initialises the noise generator.
    pub const fn new(seed: u64) -> Self {
        VoiceBuffers {
            synth: Synth::new(seed),
            mixer: Mixer::new(),
            scratch: [0; N],
        }
    }
}

/// Beat box core with `N`-sample voices.
///
/// Holds only the sequencer, the knob and the sink by value; the sample
/// buffers are borrowed from a [`VoiceBuffers`].
///
/// # Example
/// ```ignore
/// #[init(local = [voices: VoiceBuffers<MAX_SAMPLES> = VoiceBuffers::new(0x5eed)])]
/// fn init(cx: init::Context) -> (Shared, Local) {
///     let mut engine = Engine::new(audio_out, cx.local.voices, StepMode::Sixteen);
///     engine.play(now_us());
///     // ...
/// }
///
/// // main loop
/// engine.tick(now_us())?;
/// engine.update_from_adc(pot.read());
/// ```
pub struct Engine<'a, S, const N: usize> {
    sequencer: Sequencer,
    control: ControlSurface,
    voices: &'a mut VoiceBuffers<N>,
    sink: S,
}

impl<'a, S, const N: usize> Engine<'a, S, N>
where
    S: AudioSink,
{
    pub fn new(sink: S, voices: &'a mut VoiceBuffers<N>, mode: StepMode) -> Self {
        Engine {
            sequencer: Sequencer::new(mode),
            control: ControlSurface::new(),
            voices,
            sink,
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Direct access for edits that don't affect the knob (patterns, tempo).
    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    pub fn control(&self) -> &ControlSurface {
        &self.control
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release the audio sink and the borrowed buffers.
    pub fn release(self) -> (S, &'a mut VoiceBuffers<N>) {
        (self.sink, self.voices)
    }

    // ── Transport ──────────────────────────────────────────────────────

    pub fn play(&mut self, now_us: u64) {
        self.sequencer.play(now_us);
    }

    /// Stop the sequencer and silence the output.
    pub fn stop(&mut self) -> Result<(), S::Error> {
        self.sequencer.stop();
        self.sink.stop_playback()
    }

    pub fn toggle_play(&mut self, now_us: u64) -> Result<(), S::Error> {
        if self.sequencer.is_playing() {
            self.stop()
        } else {
            self.play(now_us);
            Ok(())
        }
    }

    /// Advance with a microsecond timestamp and play any step that fired.
    pub fn tick(&mut self, now_us: u64) -> Result<Option<StepHits>, S::Error> {
        match self.sequencer.tick(now_us) {
            Some(hits) => {
                self.trigger(hits)?;
                Ok(Some(hits))
            }
            None => Ok(None),
        }
    }

    /// Advance from a 1 kHz timer and play any step that fired.
    pub fn tick_1ms(&mut self) -> Result<Option<StepHits>, S::Error> {
        match self.sequencer.tick_1ms() {
            Some(hits) => {
                self.trigger(hits)?;
                Ok(Some(hits))
            }
            None => Ok(None),
        }
    }

    /// Render, mix and start playing the tracks in `hits`.
    ///
    /// Returns `Ok(false)` when nothing was started: no hits, or the
    /// previous mix is still playing.
    pub fn trigger(&mut self, hits: StepHits) -> Result<bool, S::Error> {
        if hits.is_empty() {
            return Ok(false);
        }
        if self.sink.is_playing() {
            debug!("engine: step {} dropped, output busy", hits.step);
            return Ok(false);
        }

        let VoiceBuffers {
            synth,
            mixer,
            scratch,
        } = &mut *self.voices;
        let sequencer = &self.sequencer;

        // Render every hit to the longest voice so short voices pad with
        // silence instead of dropping out of the average.
        let len = hits
            .iter()
            .filter_map(|t| sequencer.track(t))
            .map(|t| synth.voiced_len(t.params(), N))
            .max()
            .unwrap_or(0)
            .max(1)
            .min(N);

        mixer.clear();
        for t in hits.iter() {
            let Some(track) = sequencer.track(t) else {
                continue;
            };
            synth.generate(&mut scratch[..len], track.params());
            mixer.add_track(t, &scratch[..len]);
        }

        let Some(mix) = mixer.output() else {
            return Ok(false);
        };
        match self.sink.start_playback(mix) {
            Ok(()) => Ok(true),
            Err(PlaybackError::Busy) | Err(PlaybackError::Empty) => Ok(false),
            Err(PlaybackError::Pwm(e)) => {
                error!("engine: playback failed on step {}", hits.step);
                Err(e)
            }
        }
    }

    // ── Tempo ──────────────────────────────────────────────────────────

    pub fn set_bpm(&mut self, bpm: u16) {
        self.sequencer.set_bpm(bpm);
    }

    pub fn tap(&mut self, now_us: u64) -> bool {
        self.sequencer.tap(now_us)
    }

    // ── Tracks and steps ───────────────────────────────────────────────

    pub fn next_track(&mut self) {
        self.sequencer.next_track();
        self.control.disengage_all();
    }

    pub fn prev_track(&mut self) {
        self.sequencer.prev_track();
        self.control.disengage_all();
    }

    pub fn select_track(&mut self, track: usize) -> bool {
        let selected = self.sequencer.select_track(track);
        if selected {
            self.control.disengage_all();
        }
        selected
    }

    pub fn add_track(&mut self) -> Option<usize> {
        let slot = self.sequencer.add_track()?;
        self.control.disengage_all();
        Some(slot)
    }

    pub fn delete_selected_track(&mut self) -> bool {
        let deleted = self.sequencer.delete_selected_track();
        if deleted {
            self.control.disengage_all();
        }
        deleted
    }

    /// Load a bank voice into `track`. If that is the track under the knob,
    /// the knob has to re-engage with the new values.
    pub fn assign_preset(&mut self, track: usize, preset: PresetId) -> bool {
        if !self.sequencer.assign_preset(track, preset) {
            return false;
        }
        self.preset_changed(track);
        true
    }

    pub fn toggle_step(&mut self, track: usize, step: usize) -> bool {
        self.sequencer.toggle_step(track, step)
    }

    pub fn toggle_selected_step(&mut self) -> bool {
        self.sequencer.toggle_selected_step()
    }

    pub fn next_step(&mut self) {
        self.sequencer.next_step();
    }

    pub fn prev_step(&mut self) {
        self.sequencer.prev_step();
    }

    fn preset_changed(&mut self, track: usize) {
        if track == self.sequencer.selected_track() {
            self.control.disengage_all();
        }
    }

    // ── Parameters ─────────────────────────────────────────────────────

    pub fn active_param(&self) -> ParamId {
        self.control.active()
    }

    pub fn next_param(&mut self) {
        self.control.next_param();
    }

    pub fn prev_param(&mut self) {
        self.control.prev_param();
    }

    /// Feed a knob position in `[0, 1]` to the active parameter of the
    /// selected track. Returns `true` if the parameter changed.
    pub fn set_param_from_normalized(&mut self, raw: f32) -> bool {
        self.control
            .update_active(self.sequencer.selected_params_mut(), raw)
    }

    /// Same as [`set_param_from_normalized`](Self::set_param_from_normalized)
    /// from a raw 12-bit ADC reading.
    pub fn update_from_adc(&mut self, adc: u16) -> bool {
        self.control
            .update_from_adc(self.sequencer.selected_params_mut(), adc)
    }

    pub fn selected_wave(&self) -> &WaveParams {
        self.sequencer.selected_wave()
    }

    /// Render the selected track's voice for display. Returns the number of
    /// samples written (`out.len()`).
    pub fn preview(&mut self, out: &mut [f32]) -> usize {
        self.voices
            .synth
            .generate(out, self.sequencer.selected_wave())
    }

    // ── UI ─────────────────────────────────────────────────────────────

    /// Route a debounced press through the sequencer screen and follow up
    /// on what it changed.
    pub fn handle_ui(
        &mut self,
        ui: &mut Ui,
        button: Button,
        press: Press,
        now_us: u64,
    ) -> Result<Option<UiAction>, S::Error> {
        let action = ui.handle(button, press, &mut self.sequencer, now_us);
        match action {
            Some(UiAction::TransportToggled) if !self.sequencer.is_playing() => {
                self.sink.stop_playback()?;
            }
            Some(UiAction::PresetAssigned { track }) => self.preset_changed(track),
            Some(UiAction::TrackSelected { .. }) => self.control.disengage_all(),
            _ => {}
        }
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::FOUR_ON_THE_FLOOR;

    const N: usize = 2048;
    /// 120 bpm, four steps per beat.
    const STEP_US: u64 = 125_000;

    #[derive(Debug, PartialEq)]
    struct MockError;

    /// Records playback requests; stays "playing" until `finish` is called.
    #[derive(Default)]
    struct MockSink {
        playing: bool,
        started: usize,
        stopped: usize,
        last_len: usize,
        fail: bool,
    }

    impl MockSink {
        fn finish(&mut self) {
            self.playing = false;
        }
    }

    impl AudioSink for MockSink {
        type Error = MockError;

        fn start_playback(&mut self, samples: &[u16]) -> Result<(), PlaybackError<MockError>> {
            if self.playing {
                return Err(PlaybackError::Busy);
            }
            if samples.is_empty() {
                return Err(PlaybackError::Empty);
            }
            if self.fail {
                return Err(PlaybackError::Pwm(MockError));
            }
            self.playing = true;
            self.started += 1;
            self.last_len = samples.len();
            Ok(())
        }

        fn is_playing(&self) -> bool {
            self.playing
        }

        fn stop_playback(&mut self) -> Result<(), MockError> {
            self.playing = false;
            self.stopped += 1;
            Ok(())
        }
    }

    fn make_engine(voices: &mut VoiceBuffers<N>) -> Engine<'_, MockSink, N> {
        Engine::new(MockSink::default(), voices, StepMode::Sixteen)
    }

    /// Tick through steps 0..=3; the default pattern first hits on step 3.
    fn run_to_first_hit(engine: &mut Engine<'_, MockSink, N>) {
        engine.play(0);
        for k in 1..=4 {
            engine.tick(k * STEP_US).unwrap();
        }
    }

    #[test]
    fn sample_buffers_live_outside_the_engine() {
        use crate::constants::MAX_SAMPLES;
        assert!(core::mem::size_of::<Engine<'static, MockSink, MAX_SAMPLES>>() < 4096);

        const VOICES: VoiceBuffers<64> = VoiceBuffers::new(3);
        let mut voices = VOICES;
        let engine = Engine::new(MockSink::default(), &mut voices, StepMode::Eight);
        assert!(!engine.sequencer().is_playing());
    }

    #[test]
    fn hit_steps_start_playback() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        assert_eq!(engine.sequencer().track(0).unwrap().pattern(), FOUR_ON_THE_FLOOR);
        run_to_first_hit(&mut engine);

        let sink = engine.sink();
        assert_eq!(sink.started, 1);
        // kick decay outlasts the buffer
        assert_eq!(sink.last_len, N);
    }

    #[test]
    fn empty_steps_do_not_touch_output() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        engine.play(0);
        for k in 1..=3 {
            let hits = engine.tick(k * STEP_US).unwrap().unwrap();
            assert!(hits.is_empty());
        }
        assert_eq!(engine.sink().started, 0);
    }

    #[test]
    fn busy_output_drops_the_step() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        run_to_first_hit(&mut engine);
        assert!(engine.sink().is_playing());

        // step 7 fires while the first hit is still playing
        for k in 5..=8 {
            engine.tick(k * STEP_US).unwrap();
        }
        assert_eq!(engine.sink().started, 1);

        engine.sink_mut().finish();
        for k in 9..=12 {
            engine.tick(k * STEP_US).unwrap();
        }
        assert_eq!(engine.sink().started, 2);
    }

    #[test]
    fn simultaneous_hits_are_mixed_to_longest_voice() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        assert!(engine.assign_preset(1, PresetId::HI_HAT));
        assert!(engine.toggle_step(1, 0));

        let hits = StepHits {
            step: 0,
            tracks: 0b11,
        };
        assert!(engine.trigger(hits).unwrap());
        assert_eq!(engine.sink().last_len, N);

        // hi-hat alone is 0.05 s long
        engine.sink_mut().finish();
        let hits = StepHits {
            step: 0,
            tracks: 0b10,
        };
        assert!(engine.trigger(hits).unwrap());
        assert_eq!(engine.sink().last_len, (0.05 * 22_050.0) as usize);
    }

    #[test]
    fn output_errors_propagate() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        engine.sink_mut().fail = true;
        engine.play(0);
        for k in 1..=3 {
            engine.tick(k * STEP_US).unwrap();
        }
        assert_eq!(engine.tick(4 * STEP_US), Err(MockError));
    }

    #[test]
    fn millisecond_ticks_drive_steps() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        engine.play(0);
        let mut fired = 0;
        for _ in 0..4 * 125 {
            if engine.tick_1ms().unwrap().is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 4);
        assert_eq!(engine.sink().started, 1);
    }

    #[test]
    fn stop_silences_output() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        run_to_first_hit(&mut engine);
        engine.stop().unwrap();
        assert!(!engine.sequencer().is_playing());
        assert!(!engine.sink().is_playing());
        assert_eq!(engine.sink().stopped, 1);

        engine.toggle_play(0).unwrap();
        assert!(engine.sequencer().is_playing());
        engine.toggle_play(0).unwrap();
        assert_eq!(engine.sink().stopped, 2);
    }

    #[test]
    fn knob_engages_before_editing() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        assert_eq!(engine.active_param(), ParamId::Frequency);
        let cfg = ParamId::Frequency.config();
        let here = cfg.normalize(engine.selected_wave().frequency);

        // far from the stored value: ignored
        assert!(!engine.set_param_from_normalized((here + 0.5).min(1.0)));
        assert_eq!(engine.selected_wave().frequency, 60.0);

        // pick it up, then move it
        engine.set_param_from_normalized(here);
        assert!(engine.control().is_engaged(ParamId::Frequency));
        assert!(engine.set_param_from_normalized(here + 0.2));
        assert!(engine.selected_wave().frequency > 60.0);
    }

    #[test]
    fn replacing_the_edited_voice_disengages_knob() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        let here = ParamId::Frequency
            .config()
            .normalize(engine.selected_wave().frequency);
        engine.set_param_from_normalized(here);
        assert!(engine.control().is_engaged(ParamId::Frequency));

        // another track: knob stays engaged
        engine.assign_preset(2, PresetId::SNARE);
        assert!(engine.control().is_engaged(ParamId::Frequency));

        engine.assign_preset(0, PresetId::SNARE);
        assert!(!engine.control().is_engaged(ParamId::Frequency));
        assert_eq!(engine.selected_wave().frequency, 250.0);
    }

    #[test]
    fn track_changes_disengage_knob() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        assert_eq!(engine.add_track(), Some(1));
        let here = ParamId::Frequency
            .config()
            .normalize(engine.selected_wave().frequency);
        engine.set_param_from_normalized(here);
        assert!(engine.control().is_engaged(ParamId::Frequency));

        engine.next_track();
        assert_eq!(engine.sequencer().selected_track(), 0);
        assert!(!engine.control().is_engaged(ParamId::Frequency));

        assert!(engine.select_track(1));
        assert!(engine.delete_selected_track());
        assert!(!engine.delete_selected_track());
    }

    #[test]
    fn adc_readings_reach_selected_track() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        engine.next_param();
        assert_eq!(engine.active_param(), ParamId::Amplitude);
        // kick amplitude is 1.0: full-scale engages, then move down
        engine.update_from_adc(4095);
        assert!(engine.update_from_adc(2048));
        let amp = engine.selected_wave().amplitude;
        assert!((amp - 0.5).abs() < 0.01);
    }

    #[test]
    fn preview_renders_selected_voice() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        let mut out = [0.0f32; 512];
        assert_eq!(engine.preview(&mut out), 512);
        assert!(out.iter().any(|&s| s.abs() > 0.1));
        assert!(out.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    }

    #[test]
    fn ui_stop_silences_output() {
        let mut voices = VoiceBuffers::new(7);
        let mut engine = make_engine(&mut voices);
        let mut ui = Ui::new();
        // label 0 -> BPM -> PLAY
        engine.handle_ui(&mut ui, Button::Up, Press::Short, 0).unwrap();
        engine.handle_ui(&mut ui, Button::Right, Press::Short, 0).unwrap();

        let action = engine.handle_ui(&mut ui, Button::Select, Press::Short, 0).unwrap();
        assert_eq!(action, Some(UiAction::TransportToggled));
        assert!(engine.sequencer().is_playing());
        assert_eq!(engine.sink().stopped, 0);

        engine.handle_ui(&mut ui, Button::Select, Press::Short, 10).unwrap();
        assert!(!engine.sequencer().is_playing());
        assert_eq!(engine.sink().stopped, 1);
    }
}
