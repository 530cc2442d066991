/// Audio sample rate in Hz (PWM sample clock).
pub const SAMPLE_RATE: f32 = 22_050.0;

/// Longest voice the synth renders, in samples (~0.74 s at [`SAMPLE_RATE`]).
pub const MAX_SAMPLES: usize = 16_384;

/// PWM counter wrap value. Duty values span `0..=PWM_WRAP` (8-bit audio).
pub const PWM_WRAP: u16 = 255;

/// PWM duty value that represents silence (mid-scale).
pub const PWM_SILENCE: u16 = PWM_WRAP / 2;

/// Entries in the sine lookup table. Must be a power of two.
pub const SINE_TABLE_SIZE: usize = 256;

/// Number of track slots in the sequencer and mixer.
pub const MAX_TRACKS: usize = 4;

/// Number of synthesis parameters exposed to the control surface.
pub const NUM_PARAMS: usize = 8;

/// Tempo limits in beats per minute.
pub const MIN_BPM: u16 = 60;
pub const MAX_BPM: u16 = 240;
pub const DEFAULT_BPM: u16 = 120;

/// Taps further apart than this restart tap-tempo detection.
pub const MAX_TAP_INTERVAL_US: u64 = 2_000_000;

/// Tap history length; the last `MAX_TAPS - 1` intervals are averaged.
pub const MAX_TAPS: usize = 4;

/// How long the BPM indicator stays lit after a tap.
pub const TAP_FLASH_US: u64 = 100_000;

/// Raw button level must be stable this long before a transition is accepted.
pub const DEBOUNCE_US: u64 = 15_000;

/// Presses held at least this long are reported as long presses.
pub const LONG_PRESS_US: u64 = 400_000;

/// A disengaged knob re-engages once within this distance of the parameter.
pub const POT_ENGAGE_TOLERANCE: f32 = 0.05;

/// Full-scale reading of the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// LED panel geometry: 64x64 pixels driven as 32 row pairs (1/32 scan).
pub const MATRIX_WIDTH: usize = 64;
pub const MATRIX_HEIGHT: usize = 64;
