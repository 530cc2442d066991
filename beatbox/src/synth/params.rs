//! Per-voice synthesis parameters.

/// Shortest decay the renderer will use, in seconds.
///
/// A decay of zero would divide by zero in the envelope, so stored values
/// below this are floored at render time.
pub const MIN_DECAY: f32 = 0.001;

/// Oscillator shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Saw,
    /// White noise, redrawn every sample (not phase-locked).
    Noise,
}

impl Waveform {
    /// All shapes in their numeric id order.
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Noise,
    ];

    /// Map a numeric waveform id (0=sine .. 4=noise). Unknown ids yield `None`.
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Waveform::Sine),
            1 => Some(Waveform::Square),
            2 => Some(Waveform::Triangle),
            3 => Some(Waveform::Saw),
            4 => Some(Waveform::Noise),
            _ => None,
        }
    }

    /// Numeric id, inverse of [`from_id`](Self::from_id).
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Three-letter label for small displays.
    pub const fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "SIN",
            Waveform::Square => "SQR",
            Waveform::Triangle => "TRI",
            Waveform::Saw => "SAW",
            Waveform::Noise => "NOI",
        }
    }
}

/// Parameters of one drum voice.
///
/// Owned by the track that plays it. The control surface mutates it live;
/// every setter path goes through [`clamp`](Self::clamp) so stored values
/// always sit inside their declared ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Base frequency in Hz (20–9000).
    pub frequency: f32,
    /// Output level (0–1).
    pub amplitude: f32,
    /// Voice length in seconds (0–2).
    pub decay: f32,
    pub waveform: Waveform,
    /// Phase offset applied before waveform lookup (0–1).
    pub offset_dc: f32,
    /// Exponential pitch drop rate (0–10).
    pub pitch_decay: f32,
    /// Crossfade towards white noise (0 = pure waveform, 1 = pure noise).
    pub noise_mix: f32,
    /// Envelope steepness exponent (0–10). Zero disables the envelope.
    pub env_curve: f32,
    /// Soft-compression amount (0–1).
    pub comp_amount: f32,
}

impl WaveParams {
    pub const FREQUENCY_RANGE: (f32, f32) = (20.0, 9000.0);
    pub const AMPLITUDE_RANGE: (f32, f32) = (0.0, 1.0);
    pub const DECAY_RANGE: (f32, f32) = (0.0, 2.0);
    pub const OFFSET_DC_RANGE: (f32, f32) = (0.0, 1.0);
    pub const PITCH_DECAY_RANGE: (f32, f32) = (0.0, 10.0);
    pub const NOISE_MIX_RANGE: (f32, f32) = (0.0, 1.0);
    pub const ENV_CURVE_RANGE: (f32, f32) = (0.0, 10.0);
    pub const COMP_AMOUNT_RANGE: (f32, f32) = (0.0, 1.0);

    /// Fallback voice used when no preset applies.
    pub const fn default_voice() -> Self {
        WaveParams {
            frequency: 200.0,
            amplitude: 0.8,
            decay: 0.4,
            waveform: Waveform::Sine,
            offset_dc: 0.0,
            pitch_decay: 3.0,
            noise_mix: 0.0,
            env_curve: 3.0,
            comp_amount: 0.0,
        }
    }

    /// Clamp every field into its declared range. NaN fields fall to the minimum.
    pub fn clamp(&mut self) {
        self.frequency = clamp_range(self.frequency, Self::FREQUENCY_RANGE);
        self.amplitude = clamp_range(self.amplitude, Self::AMPLITUDE_RANGE);
        self.decay = clamp_range(self.decay, Self::DECAY_RANGE);
        self.offset_dc = clamp_range(self.offset_dc, Self::OFFSET_DC_RANGE);
        self.pitch_decay = clamp_range(self.pitch_decay, Self::PITCH_DECAY_RANGE);
        self.noise_mix = clamp_range(self.noise_mix, Self::NOISE_MIX_RANGE);
        self.env_curve = clamp_range(self.env_curve, Self::ENV_CURVE_RANGE);
        self.comp_amount = clamp_range(self.comp_amount, Self::COMP_AMOUNT_RANGE);
    }

    /// Decay in seconds with the divide-by-zero floor applied.
    pub fn effective_decay(&self) -> f32 {
        if self.decay > MIN_DECAY {
            self.decay
        } else {
            MIN_DECAY
        }
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::default_voice()
    }
}

pub(crate) fn clamp_range(value: f32, (min, max): (f32, f32)) -> f32 {
    if value > max {
        max
    } else if value >= min {
        value
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform_ids_round_trip() {
        for wf in Waveform::ALL {
            assert_eq!(Waveform::from_id(wf.id()), Some(wf));
        }
        assert_eq!(Waveform::from_id(5), None);
    }

    #[test]
    fn clamp_pulls_fields_into_range() {
        let mut p = WaveParams {
            frequency: 5.0,
            amplitude: 3.0,
            decay: -1.0,
            waveform: Waveform::Saw,
            offset_dc: 2.0,
            pitch_decay: 50.0,
            noise_mix: f32::NAN,
            env_curve: -4.0,
            comp_amount: 1.5,
        };
        p.clamp();
        assert_eq!(p.frequency, 20.0);
        assert_eq!(p.amplitude, 1.0);
        assert_eq!(p.decay, 0.0);
        assert_eq!(p.offset_dc, 1.0);
        assert_eq!(p.pitch_decay, 10.0);
        assert_eq!(p.noise_mix, 0.0);
        assert_eq!(p.env_curve, 0.0);
        assert_eq!(p.comp_amount, 1.0);
    }

    #[test]
    fn zero_decay_is_floored() {
        let mut p = WaveParams::default_voice();
        p.decay = 0.0;
        assert_eq!(p.effective_decay(), MIN_DECAY);
        p.decay = 0.5;
        assert_eq!(p.effective_decay(), 0.5);
    }
}
