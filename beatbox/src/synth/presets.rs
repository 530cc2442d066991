//! Factory voice bank.

use super::params::{WaveParams, Waveform};

/// Index into [`PRESETS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetId(u8);

impl PresetId {
    pub const KICK: PresetId = PresetId(0);
    pub const SNARE: PresetId = PresetId(1);
    pub const HI_HAT: PresetId = PresetId(2);
    pub const BASS_808: PresetId = PresetId(3);
    pub const TONE: PresetId = PresetId(4);
    pub const OPEN_HAT: PresetId = PresetId(5);
    pub const PURE_SINE: PresetId = PresetId(6);
    pub const PURE_TRIANGLE: PresetId = PresetId(7);
    pub const PURE_SQUARE: PresetId = PresetId(8);
    pub const PURE_NOISE: PresetId = PresetId(9);

    /// Checked constructor: `None` when `index` is past the end of the bank.
    pub const fn new(index: usize) -> Option<Self> {
        if index < PRESETS.len() {
            Some(PresetId(index as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn params(self) -> WaveParams {
        PRESETS[self.0 as usize].params
    }

    pub const fn name(self) -> &'static str {
        PRESETS[self.0 as usize].name
    }
}

/// A named factory voice.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub params: WaveParams,
}

#[allow(clippy::too_many_arguments)]
const fn voice(
    name: &'static str,
    frequency: f32,
    amplitude: f32,
    decay: f32,
    waveform: Waveform,
    pitch_decay: f32,
    noise_mix: f32,
    env_curve: f32,
    comp_amount: f32,
) -> Preset {
    Preset {
        name,
        params: WaveParams {
            frequency,
            amplitude,
            decay,
            waveform,
            offset_dc: 0.0,
            pitch_decay,
            noise_mix,
            env_curve,
            comp_amount,
        },
    }
}

/// The ten factory voices: six drum sounds followed by four plain shapes.
pub const PRESETS: [Preset; 10] = [
    voice("KICK", 60.0, 1.0, 0.25, Waveform::Sine, 8.0, 0.0, 4.0, 0.5),
    voice("SNARE", 250.0, 0.8, 0.15, Waveform::Sine, 0.8, 0.8, 5.0, 0.6),
    voice("HIHAT", 8000.0, 0.5, 0.05, Waveform::Noise, 0.0, 1.0, 6.0, 0.3),
    voice("808", 55.0, 1.0, 1.2, Waveform::Sine, 2.0, 0.0, 2.5, 0.25),
    voice("TONE", 440.0, 0.7, 0.5, Waveform::Triangle, 0.0, 0.0, 0.0, 0.2),
    voice("OPENHAT", 8000.0, 0.5, 0.25, Waveform::Noise, 0.0, 1.0, 3.0, 0.4),
    voice("SINE", 440.0, 0.7, 0.5, Waveform::Sine, 0.0, 0.0, 0.0, 0.0),
    voice("TRIANGLE", 440.0, 0.7, 0.5, Waveform::Triangle, 0.0, 0.0, 0.0, 0.0),
    voice("SQUARE", 440.0, 0.7, 0.5, Waveform::Square, 0.0, 0.0, 0.0, 0.0),
    voice("NOISE", 440.0, 0.7, 0.5, Waveform::Noise, 0.0, 1.0, 0.0, 0.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_ids_are_bounds_checked() {
        assert_eq!(PresetId::new(0), Some(PresetId::KICK));
        assert_eq!(PresetId::new(9), Some(PresetId::PURE_NOISE));
        assert_eq!(PresetId::new(PRESETS.len()), None);
    }

    #[test]
    fn presets_are_within_declared_ranges() {
        for preset in PRESETS.iter() {
            let mut clamped = preset.params;
            clamped.clamp();
            assert_eq!(clamped, preset.params, "{} out of range", preset.name);
        }
    }

    #[test]
    fn plain_shape_presets_match_their_names() {
        assert_eq!(PresetId::PURE_SINE.params().waveform, Waveform::Sine);
        assert_eq!(PresetId::PURE_TRIANGLE.params().waveform, Waveform::Triangle);
        assert_eq!(PresetId::PURE_SQUARE.params().waveform, Waveform::Square);
        assert_eq!(PresetId::PURE_NOISE.params().waveform, Waveform::Noise);
    }
}
