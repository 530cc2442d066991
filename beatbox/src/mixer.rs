//! Averaging mixer for rendered track buffers.
//!
//! Tracks are accumulated into a 32-bit buffer so any number of full-scale
//! PWM voices can be summed without overflow; the output is the per-sample
//! average, clipped to the PWM range. Uses const generic `N` for the mix
//! capacity instead of a fixed global buffer.

use crate::constants::{MAX_TRACKS, PWM_WRAP};

/// Mixes up to `N` samples of PWM duty values from any number of tracks.
///
/// # Example
/// ```ignore
/// let mut mixer = Mixer::<4096>::new();
/// mixer.add_track(0, &kick);
/// mixer.add_track(1, &snare);
/// if let Some(mix) = mixer.output() {
///     audio.start_playback(mix)?;
/// }
/// mixer.clear();
/// ```
pub struct Mixer<const N: usize> {
    acc: [u32; N],
    out: [u16; N],
    /// Longest track added since the last clear.
    len: usize,
    count: u32,
}

impl<const N: usize> Mixer<N> {
    /// Create an empty mixer.
    pub const fn new() -> Self {
        Mixer {
            acc: [0; N],
            out: [0; N],
            len: 0,
            count: 0,
        }
    }

    /// Start a new mixing cycle.
    pub fn clear(&mut self) {
        self.acc[..self.len].fill(0);
        self.len = 0;
        self.count = 0;
    }

    /// Accumulate one rendered track.
    ///
    /// Rejects unknown track ids, empty buffers and buffers longer than the
    /// mix capacity. Shorter buffers contribute silence (zero) past their end.
    pub fn add_track(&mut self, track: usize, samples: &[u16]) -> bool {
        if track >= MAX_TRACKS || samples.is_empty() || samples.len() > N {
            debug!("mixer: rejected track {} ({} samples)", track, samples.len());
            return false;
        }
        for (a, &s) in self.acc.iter_mut().zip(samples.iter()) {
            *a += s as u32;
        }
        if samples.len() > self.len {
            self.len = samples.len();
        }
        self.count += 1;
        true
    }

    pub fn has_active_tracks(&self) -> bool {
        self.count > 0
    }

    /// Tracks added since the last clear.
    pub fn track_count(&self) -> usize {
        self.count as usize
    }

    /// Mixed length: the longest track added.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Finalise and return the mix, or `None` when no track was added.
    ///
    /// Recomputed from the accumulator on each call, so calling it twice
    /// before the next [`clear`](Self::clear) yields the same samples.
    pub fn output(&mut self) -> Option<&[u16]> {
        if self.count == 0 {
            return None;
        }
        let count = self.count;
        if count == 1 {
            // Fast path: average of one is the sample itself
            for (o, &a) in self.out.iter_mut().zip(self.acc[..self.len].iter()) {
                *o = clip(a);
            }
        } else {
            for (o, &a) in self.out.iter_mut().zip(self.acc[..self.len].iter()) {
                *o = clip(a / count);
            }
        }
        Some(&self.out[..self.len])
    }
}

impl<const N: usize> Default for Mixer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn clip(v: u32) -> u16 {
    if v > PWM_WRAP as u32 {
        PWM_WRAP
    } else {
        v as u16
    }
}
