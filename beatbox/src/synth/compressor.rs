//! Soft-knee style compressor applied after the envelope.

use super::params::Waveform;

/// Above this amount the compressor also hard-limits its output.
const LIMIT_AMOUNT: f32 = 0.8;

/// Static compressor curve derived from a single `amount` in `[0, 1]`.
///
/// More amount lowers the threshold (0.8 down to 0.2) and raises the ratio.
/// Sine voices get a gentler ratio and makeup gain than harmonically richer
/// shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compressor {
    threshold: f32,
    ratio: f32,
    makeup: f32,
    /// Output ceiling when `amount > LIMIT_AMOUNT`.
    limit: Option<f32>,
}

impl Compressor {
    /// Build the curve for `amount`. Returns `None` when compression is off.
    pub fn new(amount: f32, waveform: Waveform) -> Option<Self> {
        let amount = if amount > 1.0 { 1.0 } else { amount };
        if amount.is_nan() || amount <= 0.0 {
            return None;
        }

        let threshold = 0.8 - 0.6 * amount;
        let (ratio, makeup) = match waveform {
            Waveform::Sine => (1.0 + 5.0 * amount, 1.0 + 0.6 * amount),
            _ => (1.0 + 9.0 * amount, 1.0 + amount),
        };
        let limit = if amount > LIMIT_AMOUNT {
            Some(1.0 - (1.0 - threshold) * 0.5)
        } else {
            None
        };

        Some(Compressor {
            threshold,
            ratio,
            makeup,
            limit,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Compress one sample.
    #[inline(always)]
    pub fn process(&self, sample: f32) -> f32 {
        let magnitude = sample.abs();
        let compressed = if magnitude > self.threshold {
            let reduced = self.threshold + (magnitude - self.threshold) / self.ratio;
            if sample < 0.0 {
                -reduced
            } else {
                reduced
            }
        } else {
            sample
        };

        let out = compressed * self.makeup;
        match self.limit {
            Some(ceiling) if out > ceiling => ceiling,
            Some(ceiling) if out < -ceiling => -ceiling,
            _ => out,
        }
    }
}
