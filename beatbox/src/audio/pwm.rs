//! PWM audio output.
//!
//! The duty cycle of one PWM channel is reloaded once per sample period,
//! either by a DMA channel paced by the PWM wrap request or by a timer
//! interrupt calling [`PwmAudioOutput::on_sample_tick`]. Playback copies into
//! a borrowed source buffer, so the caller's render buffer is free as soon as
//! playback starts. The source buffer is usually a `'static` (for example an
//! RTIC `local` resource) so it never lives on the stack.
//!
//! The driver is generic over any [`embedded_hal::pwm::SetDutyCycle`]
//! channel. Samples are scaled from `0..=PWM_WRAP` to the channel's own
//! maximum duty.

use embedded_hal::pwm::SetDutyCycle;

use super::{AudioSink, PlaybackError};
use crate::constants::{PWM_SILENCE, PWM_WRAP};

/// One-shot PWM sample player over a borrowed source buffer.
///
/// # Example
/// ```ignore
/// // #[init(local = [pwm_buf: [u16; MAX_SAMPLES] = [PWM_SILENCE; MAX_SAMPLES]])]
/// let mut out = PwmAudioOutput::new(channel, cx.local.pwm_buf);
/// out.start_playback(mix)?;
/// // in the sample-rate interrupt:
/// out.on_sample_tick()?;
/// ```
pub struct PwmAudioOutput<'a, P> {
    pwm: P,
    buffer: &'a mut [u16],
    len: usize,
    pos: usize,
    playing: bool,
}

impl<'a, P> PwmAudioOutput<'a, P>
where
    P: SetDutyCycle,
{
    /// Requests longer than `buffer` are truncated to its length.
    pub fn new(pwm: P, buffer: &'a mut [u16]) -> Self {
        Self {
            pwm,
            buffer,
            len: 0,
            pos: 0,
            playing: false,
        }
    }

    /// Park the output at mid-scale.
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.write(PWM_SILENCE)
    }

    /// Output the next sample. Call once per sample period.
    ///
    /// Clears the playing flag after the last sample, mirroring the
    /// transfer-complete interrupt of a DMA-driven output.
    pub fn on_sample_tick(&mut self) -> Result<(), P::Error> {
        if !self.playing {
            return Ok(());
        }
        let sample = self.buffer[self.pos];
        self.pos += 1;
        if self.pos >= self.len {
            self.playing = false;
        }
        self.write(sample)
    }

    /// Longest buffer a single request can play.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Samples still queued.
    pub fn remaining(&self) -> usize {
        if self.playing {
            self.len - self.pos
        } else {
            0
        }
    }

    /// Release the PWM channel and the source buffer.
    pub fn release(self) -> (P, &'a mut [u16]) {
        (self.pwm, self.buffer)
    }

    fn write(&mut self, sample: u16) -> Result<(), P::Error> {
        let sample = if sample > PWM_WRAP { PWM_WRAP } else { sample };
        self.pwm.set_duty_cycle_fraction(sample, PWM_WRAP)
    }
}

impl<P> AudioSink for PwmAudioOutput<'_, P>
where
    P: SetDutyCycle,
{
    type Error = P::Error;

    /// Copy `samples` into the source buffer and start. Buffers longer than
    /// the source buffer are truncated; a zero-length source buffer refuses
    /// every request as [`PlaybackError::Empty`].
    fn start_playback(&mut self, samples: &[u16]) -> Result<(), PlaybackError<Self::Error>> {
        if self.playing {
            debug!("pwm: busy, dropping {} samples", samples.len());
            return Err(PlaybackError::Busy);
        }
        let len = samples.len().min(self.buffer.len());
        if len == 0 {
            return Err(PlaybackError::Empty);
        }
        if len < samples.len() {
            warn!("pwm: truncating {} samples to {}", samples.len(), len);
        }
        self.buffer[..len].copy_from_slice(&samples[..len]);
        self.len = len;
        self.pos = 0;
        self.playing = true;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn stop_playback(&mut self) -> Result<(), Self::Error> {
        self.playing = false;
        self.pos = 0;
        self.write(PWM_SILENCE)
    }
}
