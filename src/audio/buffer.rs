//! Decoded sample buffer type
//!
//! All editing operates on non-interleaved 32-bit float samples, one
//! `Vec<f32>` per channel. The buffer keeps whatever sample rate the source
//! declared; no resampling happens anywhere in the pipeline.

use crate::error::{PausecutError, Result};

/// Multi-channel floating-point sample buffer.
///
/// Invariant: every channel holds the same number of frames. Samples are
/// nominally in [-1.0, 1.0]; rare excursions beyond that are clamped when
/// the buffer is encoded to 16-bit PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Create a zero-filled buffer with the given shape
    pub fn new(channel_count: usize, frame_count: usize, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: vec![vec![0.0; frame_count]; channel_count],
        }
    }

    /// Create a buffer from existing per-channel sample data
    ///
    /// Fails if no channels are given or channel lengths differ. A zero
    /// frame count is allowed; splicing everything away produces one.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(PausecutError::DecodeFailed {
                reason: "audio has no channels".to_string(),
                source: None,
            });
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(PausecutError::DecodeFailed {
                reason: "channels have differing frame counts".to_string(),
                source: None,
            });
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Whether the buffer contains no frames
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Samples of a single channel
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// All channels, non-interleaved
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutable samples of a single channel
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Interleave all channels frame by frame ([L0, R0, L1, R1, ...])
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frame_count();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for frame in 0..frames {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = SampleBuffer::new(2, 1000, 44100);
        assert_eq!(buf.channel_count(), 2);
        assert_eq!(buf.frame_count(), 1000);
        assert_eq!(buf.sample_rate(), 44100);
        assert!((buf.duration() - 1000.0 / 44100.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_channels_rejects_ragged_data() {
        let result = SampleBuffer::from_channels(vec![vec![0.0; 10], vec![0.0; 9]], 48000);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_channels_rejects_zero_channels() {
        assert!(SampleBuffer::from_channels(vec![], 48000).is_err());
    }

    #[test]
    fn test_zero_frame_buffer_is_valid() {
        let buf = SampleBuffer::from_channels(vec![vec![], vec![]], 24000).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.duration(), 0.0);
    }

    #[test]
    fn test_interleaved() {
        let buf =
            SampleBuffer::from_channels(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 48000)
                .unwrap();
        assert_eq!(buf.interleaved(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }
}
