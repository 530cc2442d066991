//! Output sample representations.

use crate::constants::{PWM_SILENCE, PWM_WRAP};

/// A numeric format the renderer can write.
///
/// Renderers work in `[-1.0, 1.0]`; implementations map that range onto
/// their own representation and name the value that means "no sound".
pub trait Sample: Copy {
    /// The silence value written past the end of a voice.
    const SILENCE: Self;

    /// Convert a sample already clamped to `[-1.0, 1.0]`.
    fn from_unit(value: f32) -> Self;
}

/// 8-bit PWM duty, centred on [`PWM_SILENCE`].
impl Sample for u16 {
    const SILENCE: Self = PWM_SILENCE;

    #[inline(always)]
    fn from_unit(value: f32) -> Self {
        let duty = (value + 1.0) * (PWM_WRAP as f32 * 0.5);
        if duty <= 0.0 {
            0
        } else if duty >= PWM_WRAP as f32 {
            PWM_WRAP
        } else {
            duty as u16
        }
    }
}

/// Signed float, used for waveform previews.
impl Sample for f32 {
    const SILENCE: Self = 0.0;

    #[inline(always)]
    fn from_unit(value: f32) -> Self {
        value
    }
}

/// Signed 16-bit PCM.
impl Sample for i16 {
    const SILENCE: Self = 0;

    #[inline(always)]
    fn from_unit(value: f32) -> Self {
        (value * i16::MAX as f32) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pwm_duty_spans_full_range() {
        assert_eq!(u16::from_unit(-1.0), 0);
        assert_eq!(u16::from_unit(0.0), PWM_SILENCE);
        assert_eq!(u16::from_unit(1.0), PWM_WRAP);
    }

    #[test]
    fn pcm_is_symmetric() {
        assert_eq!(i16::from_unit(1.0), 32767);
        assert_eq!(i16::from_unit(-1.0), -32767);
        assert_eq!(i16::from_unit(0.0), 0);
    }
}
