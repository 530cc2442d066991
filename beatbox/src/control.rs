//! Potentiometer control surface.
//!
//! A single physical knob is multiplexed across the eight voice parameters.
//! Switching the parameter under the knob disengages it: the knob must first
//! be brought close to the parameter's current position before it takes
//! over, so switching pages never makes the value jump.

use crate::constants::{ADC_MAX, NUM_PARAMS, POT_ENGAGE_TOLERANCE};
use crate::synth::params::clamp_range;
use crate::synth::WaveParams;

/// Lower bound substituted for an exponential range that starts at zero.
const EXP_FLOOR: f32 = 0.01;

/// A knob-editable voice parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamId {
    Frequency,
    Amplitude,
    Decay,
    OffsetDc,
    PitchDecay,
    NoiseMix,
    EnvCurve,
    CompAmount,
}

impl ParamId {
    pub const ALL: [ParamId; NUM_PARAMS] = [
        ParamId::Frequency,
        ParamId::Amplitude,
        ParamId::Decay,
        ParamId::OffsetDc,
        ParamId::PitchDecay,
        ParamId::NoiseMix,
        ParamId::EnvCurve,
        ParamId::CompAmount,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < NUM_PARAMS {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Following parameter, wrapping after the last.
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % NUM_PARAMS]
    }

    /// Preceding parameter, wrapping before the first.
    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + NUM_PARAMS - 1) % NUM_PARAMS]
    }

    pub const fn label(self) -> &'static str {
        match self {
            ParamId::Frequency => "FREQ",
            ParamId::Amplitude => "AMP",
            ParamId::Decay => "DECAY",
            ParamId::OffsetDc => "DC",
            ParamId::PitchDecay => "PDECAY",
            ParamId::NoiseMix => "NOISE",
            ParamId::EnvCurve => "ENV",
            ParamId::CompAmount => "COMP",
        }
    }

    /// Knob mapping for this parameter.
    pub const fn config(self) -> ParamConfig {
        match self {
            ParamId::Frequency => ParamConfig::exponential(WaveParams::FREQUENCY_RANGE, 75.0),
            ParamId::Amplitude => ParamConfig::linear(WaveParams::AMPLITUDE_RANGE, 0.01),
            ParamId::Decay => ParamConfig::linear(WaveParams::DECAY_RANGE, 0.01),
            ParamId::OffsetDc => ParamConfig::linear(WaveParams::OFFSET_DC_RANGE, 0.01),
            ParamId::PitchDecay => ParamConfig::exponential(WaveParams::PITCH_DECAY_RANGE, 0.1),
            ParamId::NoiseMix => ParamConfig::linear(WaveParams::NOISE_MIX_RANGE, 0.1),
            ParamId::EnvCurve => ParamConfig::linear(WaveParams::ENV_CURVE_RANGE, 0.1),
            ParamId::CompAmount => ParamConfig::linear(WaveParams::COMP_AMOUNT_RANGE, 0.01),
        }
    }

    pub fn get(self, params: &WaveParams) -> f32 {
        match self {
            ParamId::Frequency => params.frequency,
            ParamId::Amplitude => params.amplitude,
            ParamId::Decay => params.decay,
            ParamId::OffsetDc => params.offset_dc,
            ParamId::PitchDecay => params.pitch_decay,
            ParamId::NoiseMix => params.noise_mix,
            ParamId::EnvCurve => params.env_curve,
            ParamId::CompAmount => params.comp_amount,
        }
    }

    /// Store `value`, clamped into the parameter's range.
    pub fn set(self, params: &mut WaveParams, value: f32) {
        let cfg = self.config();
        let value = clamp_range(value, (cfg.min, cfg.max));
        let slot = match self {
            ParamId::Frequency => &mut params.frequency,
            ParamId::Amplitude => &mut params.amplitude,
            ParamId::Decay => &mut params.decay,
            ParamId::OffsetDc => &mut params.offset_dc,
            ParamId::PitchDecay => &mut params.pitch_decay,
            ParamId::NoiseMix => &mut params.noise_mix,
            ParamId::EnvCurve => &mut params.env_curve,
            ParamId::CompAmount => &mut params.comp_amount,
        };
        *slot = value;
    }
}

/// Scale between a knob position in `[0, 1]` and a parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamConfig {
    pub min: f32,
    pub max: f32,
    /// Smallest change worth committing; filters ADC jitter.
    pub threshold: f32,
    /// Logarithmic taper instead of linear.
    pub exponential: bool,
}

impl ParamConfig {
    pub const fn linear((min, max): (f32, f32), threshold: f32) -> Self {
        ParamConfig {
            min,
            max,
            threshold,
            exponential: false,
        }
    }

    pub const fn exponential((min, max): (f32, f32), threshold: f32) -> Self {
        ParamConfig {
            min,
            max,
            threshold,
            exponential: true,
        }
    }

    /// Low end of the exponential taper. `ln(0)` is undefined, so a zero
    /// minimum is replaced by [`EXP_FLOOR`].
    fn exp_min(&self) -> f32 {
        if self.min > EXP_FLOOR {
            self.min
        } else {
            EXP_FLOOR
        }
    }

    /// Knob position at which `value` sits, in `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let t = if self.exponential {
            let lo = self.exp_min();
            if value <= lo {
                0.0
            } else {
                libm::logf(value / lo) / libm::logf(self.max / lo)
            }
        } else {
            (value - self.min) / (self.max - self.min)
        };
        clamp_range(t, (0.0, 1.0))
    }

    /// Parameter value at knob position `t`. Inverse of [`normalize`](Self::normalize).
    ///
    /// `t = 0` is always exactly `min`, even below an exponential floor.
    pub fn denormalize(&self, t: f32) -> f32 {
        let t = clamp_range(t, (0.0, 1.0));
        if t <= 0.0 {
            self.min
        } else if self.exponential {
            let lo = self.exp_min();
            lo * libm::expf(t * libm::logf(self.max / lo))
        } else {
            self.min + t * (self.max - self.min)
        }
    }
}

/// Engagement state of the knob for every parameter.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    engaged: [bool; NUM_PARAMS],
    active: ParamId,
}

impl ControlSurface {
    /// All parameters start disengaged with the knob on [`ParamId::Frequency`].
    pub const fn new() -> Self {
        ControlSurface {
            engaged: [false; NUM_PARAMS],
            active: ParamId::Frequency,
        }
    }

    /// Parameter currently under the knob.
    pub fn active(&self) -> ParamId {
        self.active
    }

    pub fn is_engaged(&self, param: ParamId) -> bool {
        self.engaged[param.index()]
    }

    /// Put the knob on `param` and disengage it.
    pub fn select(&mut self, param: ParamId) {
        self.active = param;
        self.engaged[param.index()] = false;
    }

    pub fn next_param(&mut self) {
        self.select(self.active.next());
    }

    pub fn prev_param(&mut self) {
        self.select(self.active.prev());
    }

    /// Forget every engagement, e.g. after the edited voice was replaced.
    pub fn disengage_all(&mut self) {
        self.engaged = [false; NUM_PARAMS];
    }

    /// Apply a knob reading in `[0, 1]` to `param`.
    ///
    /// Returns `true` only when the stored value changed. A disengaged knob
    /// engages once `raw` is within [`POT_ENGAGE_TOLERANCE`] of the
    /// parameter's current position; changes up to the parameter's threshold
    /// are ignored except at either end of travel.
    pub fn update(&mut self, params: &mut WaveParams, param: ParamId, raw: f32) -> bool {
        let raw = clamp_range(raw, (0.0, 1.0));
        let cfg = param.config();
        let current = param.get(params);

        let slot = &mut self.engaged[param.index()];
        if !*slot {
            if (raw - cfg.normalize(current)).abs() > POT_ENGAGE_TOLERANCE {
                return false;
            }
            *slot = true;
        }

        let value = cfg.denormalize(raw);
        // the ends of travel land exactly, whatever the threshold
        let at_end = raw <= 0.0 || raw >= 1.0;
        if value == current || (!at_end && (value - current).abs() <= cfg.threshold) {
            return false;
        }
        param.set(params, value);
        true
    }

    /// [`update`](Self::update) the parameter currently under the knob.
    pub fn update_active(&mut self, params: &mut WaveParams, raw: f32) -> bool {
        self.update(params, self.active, raw)
    }

    /// [`update_active`](Self::update_active) from a raw 12-bit ADC reading.
    pub fn update_from_adc(&mut self, params: &mut WaveParams, adc: u16) -> bool {
        self.update_active(params, adc_to_unit(adc))
    }
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a 12-bit ADC reading onto `[0, 1]`, saturating above [`ADC_MAX`].
pub fn adc_to_unit(adc: u16) -> f32 {
    adc.min(ADC_MAX) as f32 / ADC_MAX as f32
}
