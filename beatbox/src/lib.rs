//! # beatbox
//!
//! A `no_std`, zero-allocation core for a microcontroller drum machine:
//! drum-voice synthesis, a multi-track step sequencer with an averaging
//! mixer, and a HUB75 LED matrix with the button-driven sequencer screen.
//! Everything is sized at compile time with const generics and talks to
//! hardware only through `embedded-hal` 1.0 traits.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Synthesis | [`synth`] | Oscillator, envelope, pitch drop, noise blend, compressor, preset bank |
//! | Control | [`control`] | Potentiometer mapping with pick-up engagement |
//! | Sequencing | [`sequencer`] / [`mixer`] | Tracks, patterns, tempo, tap tempo, track mixing |
//! | Output | [`audio`] | Playback contract and PWM sample player |
//! | Input | [`input`] | Interrupt event queue, debouncing, button pad |
//! | Display | [`matrix`] / [`ui`] | Framebuffer, fonts, HUB75 scan-out, sequencer screen |
//! | Glue | [`engine`] | Wires the above into one step-driven machine |
//!
//! ## Quick start
//!
//! ```ignore
//! use beatbox::audio::PwmAudioOutput;
//! use beatbox::constants::{MAX_SAMPLES, PWM_SILENCE};
//! use beatbox::engine::{Engine, VoiceBuffers};
//! use beatbox::sequencer::StepMode;
//!
//! // Sample-sized buffers are built at compile time and never touch the stack.
//! #[init(local = [
//!     voices: VoiceBuffers<MAX_SAMPLES> = VoiceBuffers::new(0x5eed),
//!     pwm_buf: [u16; MAX_SAMPLES] = [PWM_SILENCE; MAX_SAMPLES],
//! ])]
//! fn init(cx: init::Context) -> (Shared, Local) {
//!     let pwm_out = PwmAudioOutput::new(pwm_channel, cx.local.pwm_buf);
//!     let engine = Engine::new(pwm_out, cx.local.voices, StepMode::Eight);
//!     // ...
//! }
//!
//! // idle loop
//! loop {
//!     for (button, press) in pad.poll(now_us())? {
//!         engine.handle_ui(&mut ui, button, press, now_us())?;
//!     }
//!     engine.tick(now_us())?;
//!     engine.update_from_adc(pot.read());
//!     ui.render(&mut fb, engine.sequencer(), now_us());
//!     panel.refresh(&fb)?;
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `hal` | yes | HUB75 driver, PWM output, button pad and [`halt`] (requires `embedded-hal`) |
//! | `defmt` | no | Crate logging through `defmt` |
//! | `log` | no | Crate logging through `log` |
//!
//! ## Audio parameters
//!
//! - **Sample rate:** 22 050 Hz ([`constants::SAMPLE_RATE`])
//! - **Longest voice:** 16 384 samples ([`constants::MAX_SAMPLES`])
//! - **Output format:** 8-bit PWM duty in `u16`, silence at 127

#![no_std]

#[macro_use]
mod fmt;

pub mod constants;
pub mod synth;
pub mod control;
pub mod sequencer;
pub mod mixer;
pub mod audio;
pub mod input;
pub mod matrix;
pub mod ui;
pub mod engine;

#[cfg(feature = "hal")]
pub mod halt;

#[cfg(feature = "hal")]
pub use halt::halt;
