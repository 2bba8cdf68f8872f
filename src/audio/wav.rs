//! Container encoder
//!
//! Serializes a [`SampleBuffer`] into canonical 16-bit PCM RIFF/WAVE bytes:
//! a 44-byte header followed by little-endian samples interleaved frame by
//! frame. The layout is bit-exact against the RIFF/WAVE PCM spec so any
//! standard player opens the result; the integration tests verify it
//! byte-for-byte.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::buffer::SampleBuffer;
use crate::error::{PausecutError, Result};

/// Bit depth of the exported container. Fixed; the editor performs binary
/// keep/remove splicing only, never bit-depth conversion of the source.
pub const EXPORT_BITS_PER_SAMPLE: u16 = 16;

/// Convert a float sample to a 16-bit PCM word.
///
/// Clamps to [-1.0, 1.0] and rounds to nearest. Rounding is the one
/// conversion rule used everywhere in the crate.
#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Encode a sample buffer as a complete WAV file in memory.
///
/// A zero-frame buffer is a valid degenerate input and produces a
/// structurally valid 44-byte container with an empty data chunk.
pub fn encode(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: EXPORT_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| PausecutError::ExportFailed {
        reason: format!("failed to start WAV container: {}", e),
    })?;

    for sample in buffer.interleaved() {
        writer
            .write_sample(sample_to_i16(sample))
            .map_err(|e| PausecutError::ExportFailed {
                reason: format!("failed to write sample: {}", e),
            })?;
    }

    writer.finalize().map_err(|e| PausecutError::ExportFailed {
        reason: format!("failed to finalize WAV container: {}", e),
    })?;

    Ok(cursor.into_inner())
}

/// Output file name for an edited source: `<base>_no_pauses.wav`.
pub fn export_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("edited");
    format!("{}_no_pauses.wav", base)
}
