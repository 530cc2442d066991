//! Audio output: the playback contract and the PWM implementation.

#[cfg(feature = "hal")]
pub mod pwm;

#[cfg(feature = "hal")]
pub use pwm::PwmAudioOutput;

/// Why a playback request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError<E> {
    /// A buffer is still playing. The request is dropped, not queued.
    Busy,
    /// The buffer held no samples.
    Empty,
    /// The output hardware reported an error.
    Pwm(E),
}

/// Trait for a one-shot sample player (e.g. PWM fed by DMA).
///
/// At most one buffer is in flight. Callers poll
/// [`is_playing`](Self::is_playing) if they want to retry a refused request.
pub trait AudioSink {
    /// Error type of the underlying hardware.
    type Error;

    /// Begin playing `samples` (8-bit PWM duty values).
    fn start_playback(&mut self, samples: &[u16]) -> Result<(), PlaybackError<Self::Error>>;

    /// Whether a buffer is still being played.
    fn is_playing(&self) -> bool;

    /// Abort playback and return the output to silence.
    fn stop_playback(&mut self) -> Result<(), Self::Error>;
}
