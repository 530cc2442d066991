//! Drum voice synthesis: parameters, the factory bank and the renderer.

pub mod compressor;
pub mod oscillator;
pub mod params;
pub mod presets;
pub mod sample;
pub mod wavetable;

pub use compressor::Compressor;
pub use oscillator::Synth;
pub use params::{WaveParams, Waveform, MIN_DECAY};
pub use presets::{Preset, PresetId, PRESETS};
pub use sample::Sample;
pub use wavetable::SineTable;
