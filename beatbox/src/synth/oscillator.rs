//! Drum voice renderer.
//!
//! One-shot synthesis: a phase accumulator drives a waveform lookup, the
//! frequency falls exponentially with `pitch_decay`, an exponential amplitude
//! envelope shapes the level, and an optional compressor squashes peaks. The
//! whole voice is rendered eagerly into a caller buffer; nothing runs per
//! sample at playback time.

use crate::constants::SAMPLE_RATE;

use super::compressor::Compressor;
use super::params::{WaveParams, Waveform};
use super::sample::Sample;
use super::wavetable::SineTable;

/// Voice renderer with envelope caches for up to `MAX` samples.
///
/// The caches are owned by the renderer rather than shared globally, so two
/// `Synth`s never interfere. `MAX` bounds the longest voice: a `decay` longer
/// than `MAX / sample_rate` seconds is cut at `MAX` samples.
///
/// With `MAX_SAMPLES` the caches are 128 KiB, so build it in a `static` or an
/// RTIC `local` resource rather than on the stack.
///
/// # Example
/// ```ignore
/// // #[init(local = [synth: Synth<MAX_SAMPLES> = Synth::new(0x5eed)])]
/// let synth = cx.local.synth;
/// let mut buf = [0u16; 4096];
/// let written = synth.generate(&mut buf, &PresetId::KICK.params());
/// ```
pub struct Synth<const MAX: usize> {
    sine: SineTable,
    sample_rate: f32,
    rng: fastrand::Rng,
    /// `exp(-env_curve / decay · t)` for the current render.
    env_cache: [f32; MAX],
    /// `exp(-pitch_decay · t)` for the current render.
    pitch_cache: [f32; MAX],
}

impl<const MAX: usize> Synth<MAX> {
    /// Create a renderer at [`SAMPLE_RATE`]. `seed` initialises the noise source.
    pub const fn new(seed: u64) -> Self {
        Self::with_sample_rate(seed, SAMPLE_RATE)
    }

    pub const fn with_sample_rate(seed: u64, sample_rate: f32) -> Self {
        Synth {
            sine: SineTable::new(),
            sample_rate,
            rng: fastrand::Rng::with_seed(seed),
            env_cache: [0.0; MAX],
            pitch_cache: [0.0; MAX],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of non-silent samples `generate` would write into `capacity`.
    pub fn voiced_len(&self, params: &WaveParams, capacity: usize) -> usize {
        let decay_samples = (params.effective_decay() * self.sample_rate) as usize;
        decay_samples.min(capacity).min(MAX)
    }

    /// Render one voice into `out`.
    ///
    /// Writes `voiced_len` samples of signal followed by `S::SILENCE` up to
    /// the end of the buffer, and returns the number of samples written
    /// (always `out.len()`).
    pub fn generate<S: Sample>(&mut self, out: &mut [S], params: &WaveParams) -> usize {
        let total = self.voiced_len(params, out.len());
        let dt = 1.0 / self.sample_rate;

        let pitch_rate = -params.pitch_decay * dt;
        let use_pitch = pitch_rate != 0.0;
        if use_pitch {
            for (i, v) in self.pitch_cache[..total].iter_mut().enumerate() {
                *v = libm::expf(pitch_rate * i as f32);
            }
        }

        let env_rate = -params.env_curve / params.effective_decay() * dt;
        let use_env = env_rate != 0.0;
        if use_env {
            for (i, v) in self.env_cache[..total].iter_mut().enumerate() {
                *v = libm::expf(env_rate * i as f32);
            }
        }

        let base_inc = params.frequency * dt;
        let offset = params.offset_dc;
        let noise_mix = params.noise_mix;
        let compressor = Compressor::new(params.comp_amount, params.waveform);

        let mut phase = 0.0f32;
        for i in 0..total {
            let inc = if use_pitch {
                base_inc * self.pitch_cache[i]
            } else {
                base_inc
            };
            phase += inc;
            if phase >= 1.0 {
                phase -= 1.0;
            }

            let mut p = phase;
            if offset != 0.0 {
                p += offset;
                if p >= 1.0 {
                    p -= 1.0;
                }
            }

            let mut value = match params.waveform {
                Waveform::Sine => self.sine.lookup(p),
                Waveform::Square => {
                    if p < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::Triangle => {
                    if p < 0.5 {
                        4.0 * p - 1.0
                    } else {
                        3.0 - 4.0 * p
                    }
                }
                Waveform::Saw => 2.0 * p - 1.0,
                Waveform::Noise => noise(&mut self.rng),
            };

            if noise_mix > 0.0 {
                value = (1.0 - noise_mix) * value + noise_mix * noise(&mut self.rng);
            }

            let env = if use_env { self.env_cache[i] } else { 1.0 };
            value *= params.amplitude * env;

            if let Some(c) = &compressor {
                value = c.process(value);
            }

            out[i] = S::from_unit(clamp_unit(value));
        }

        for s in out[total..].iter_mut() {
            *s = S::SILENCE;
        }

        out.len()
    }
}

/// Uniform sample in `[-1, 1)`.
#[inline(always)]
fn noise(rng: &mut fastrand::Rng) -> f32 {
    rng.f32() * 2.0 - 1.0
}

#[inline(always)]
fn clamp_unit(v: f32) -> f32 {
    if v > 1.0 {
        1.0
    } else if v < -1.0 {
        -1.0
    } else {
        v
    }
}
