//! Offline energy detector
//!
//! Frames the decoded signal, computes RMS energy per frame, and reports
//! runs of frames below a dB threshold that last at least the requested
//! minimum pause. Fills the detector seat when no inference bridge is
//! configured and keeps the pipeline testable without a network.

use log::debug;

use crate::audio::{self, SampleBuffer};
use crate::detect::{check_media_size, clamp_min_pause, CancelToken, PauseDetector, PauseStamp};
use crate::error::{PausecutError, Result};

/// RMS threshold below which a frame counts as silent.
const DEFAULT_THRESHOLD_DB: f32 = -40.0;

/// Analysis frame length in samples.
const DEFAULT_FRAME_SIZE: usize = 1024;

/// Energy-threshold pause detector.
pub struct EnergyDetector {
    threshold_db: f32,
    frame_size: usize,
}

impl EnergyDetector {
    pub fn new() -> Self {
        Self {
            threshold_db: DEFAULT_THRESHOLD_DB,
            frame_size: DEFAULT_FRAME_SIZE,
        }
    }

    /// Override the silence threshold, for material with a high noise floor.
    pub fn with_threshold_db(mut self, threshold_db: f32) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Scan an already-decoded buffer for silent runs.
    ///
    /// Channels are averaged into a mono mix before the energy scan so a
    /// pause means "all channels quiet".
    pub fn scan(&self, buffer: &SampleBuffer, min_pause_secs: f64) -> Vec<PauseStamp> {
        let sample_rate = buffer.sample_rate() as f64;
        let frames = buffer.frame_count();
        let threshold_linear = 10.0f32.powf(self.threshold_db / 20.0);
        let min_pause = clamp_min_pause(min_pause_secs);

        let mut stamps = Vec::new();
        let mut run_start: Option<usize> = None;

        let mut offset = 0;
        while offset < frames {
            let len = self.frame_size.min(frames - offset);
            let rms = frame_rms(buffer, offset, len);

            if rms < threshold_linear {
                run_start.get_or_insert(offset);
            } else if let Some(start) = run_start.take() {
                push_if_long_enough(&mut stamps, start, offset, sample_rate, min_pause);
            }
            offset += len;
        }
        if let Some(start) = run_start {
            push_if_long_enough(&mut stamps, start, frames, sample_rate, min_pause);
        }

        debug!(
            "energy scan found {} pause(s) >= {:.1}s below {:.1} dBFS",
            stamps.len(),
            min_pause,
            self.threshold_db
        );
        stamps
    }
}

impl Default for EnergyDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// RMS of the mono mix over `len` frames starting at `offset`.
fn frame_rms(buffer: &SampleBuffer, offset: usize, len: usize) -> f32 {
    let channel_count = buffer.channel_count() as f32;
    let mut sum_squares = 0.0f64;
    for i in offset..offset + len {
        let mixed: f32 = buffer.channels().iter().map(|c| c[i]).sum::<f32>() / channel_count;
        sum_squares += (mixed as f64) * (mixed as f64);
    }
    ((sum_squares / len as f64) as f32).sqrt()
}

fn push_if_long_enough(
    stamps: &mut Vec<PauseStamp>,
    start_frame: usize,
    end_frame: usize,
    sample_rate: f64,
    min_pause: f64,
) {
    let start = start_frame as f64 / sample_rate;
    let end = end_frame as f64 / sample_rate;
    if end - start >= min_pause {
        stamps.push(PauseStamp { start, end });
    }
}

impl PauseDetector for EnergyDetector {
    fn detect(
        &self,
        media: &[u8],
        mime: &str,
        min_pause_secs: f64,
        cancel: &CancelToken,
    ) -> Result<Vec<PauseStamp>> {
        check_media_size(media.len())?;
        if cancel.is_cancelled() {
            return Err(PausecutError::Cancelled);
        }
        let buffer = audio::decode(media, mime).map_err(|e| match e {
            err @ PausecutError::UnsupportedMedia { .. } => err,
            err => PausecutError::DetectionFailed {
                reason: format!("could not decode media for analysis: {}", err),
            },
        })?;
        Ok(self.scan(&buffer, min_pause_secs))
    }

    fn name(&self) -> &'static str {
        "local-energy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 0.5 amplitude tone with a silent gap in the middle.
    fn buffer_with_gap(sample_rate: u32, gap_start: f64, gap_end: f64, total: f64) -> SampleBuffer {
        let frames = (total * sample_rate as f64) as usize;
        let mut buffer = SampleBuffer::new(1, frames, sample_rate);
        let (gap_lo, gap_hi) = (
            (gap_start * sample_rate as f64) as usize,
            (gap_end * sample_rate as f64) as usize,
        );
        for (i, sample) in buffer.channel_mut(0).iter_mut().enumerate() {
            if i < gap_lo || i >= gap_hi {
                *sample =
                    0.5 * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sample_rate as f32).sin();
            }
        }
        buffer
    }

    #[test]
    fn test_finds_central_gap() {
        let buffer = buffer_with_gap(16000, 2.0, 3.0, 5.0);
        let stamps = EnergyDetector::new().scan(&buffer, 0.5);

        assert_eq!(stamps.len(), 1);
        // Frame granularity is 1024 samples (64 ms at 16 kHz).
        assert_relative_eq!(stamps[0].start, 2.0, epsilon = 0.13);
        assert_relative_eq!(stamps[0].end, 3.0, epsilon = 0.13);
    }

    #[test]
    fn test_short_gap_below_threshold_ignored() {
        let buffer = buffer_with_gap(16000, 2.0, 2.3, 5.0);
        let stamps = EnergyDetector::new().scan(&buffer, 0.5);
        assert!(stamps.is_empty());
    }

    #[test]
    fn test_trailing_silence_reported() {
        let buffer = buffer_with_gap(16000, 4.0, 5.0, 5.0);
        let stamps = EnergyDetector::new().scan(&buffer, 0.5);

        assert_eq!(stamps.len(), 1);
        assert_relative_eq!(stamps[0].end, 5.0, epsilon = 0.13);
    }

    #[test]
    fn test_all_loud_audio_yields_no_pauses() {
        let buffer = buffer_with_gap(16000, 0.0, 0.0, 2.0);
        assert!(EnergyDetector::new().scan(&buffer, 0.5).is_empty());
    }
}
