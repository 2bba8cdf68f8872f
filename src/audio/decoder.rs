//! Sample decoder
//!
//! Turns an uploaded media blob into a [`SampleBuffer`]. The claimed MIME
//! type is checked before any byte interpretation happens; decoding itself
//! is delegated to symphonia so uploads are not restricted to WAV.

use std::io::Cursor;
use std::path::Path;

use log::debug;
use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::buffer::SampleBuffer;
use crate::error::{PausecutError, Result};

/// Decode an uploaded media blob into a normalized sample buffer.
///
/// The session's sample rate is whatever the source declares; no
/// resampling is performed.
///
/// # Errors
/// * `UnsupportedMedia` - the MIME type is not `audio/*`
/// * `DecodeFailed` - the container or codec could not be parsed, or the
///   stream decoded to zero frames
pub fn decode(media: &[u8], mime: &str) -> Result<SampleBuffer> {
    if !mime.starts_with("audio/") {
        return Err(PausecutError::UnsupportedMedia {
            mime: mime.to_string(),
        });
    }

    let mut hint = Hint::new();
    if let Some(ext) = extension_for_mime(mime) {
        hint.with_extension(ext);
    }

    let mss = MediaSourceStream::new(
        Box::new(Cursor::new(media.to_vec())),
        Default::default(),
    );

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| PausecutError::DecodeFailed {
            reason: format!("unsupported container: {}", e),
            source: Some(Box::new(e)),
        })?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PausecutError::DecodeFailed {
            reason: "no supported audio track".to_string(),
            source: None,
        })?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PausecutError::DecodeFailed {
            reason: format!("unsupported codec: {}", e),
            source: Some(Box::new(e)),
        })?;

    let mut sample_rate = 0u32;
    let mut channels: Vec<Vec<f32>> = Vec::new();
    let mut interleaved: Option<InterleavedBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream; symphonia surfaces it as an I/O error.
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(PausecutError::DecodeFailed {
                    reason: format!("failed to read packet: {}", e),
                    source: Some(Box::new(e)),
                })
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if interleaved.is_none() {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = vec![Vec::new(); spec.channels.count()];
                    interleaved = Some(InterleavedBuffer::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = interleaved.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    let channel_count = channels.len();
                    for frame in buf.samples().chunks_exact(channel_count) {
                        for (channel, &sample) in channels.iter_mut().zip(frame) {
                            channel.push(sample);
                        }
                    }
                }
            }
            // A corrupt packet mid-stream is skippable; keep decoding.
            Err(SymphoniaError::DecodeError(e)) => debug!("skipping corrupt packet: {}", e),
            Err(e) => {
                return Err(PausecutError::DecodeFailed {
                    reason: format!("decoder failure: {}", e),
                    source: Some(Box::new(e)),
                })
            }
        }
    }

    if channels.is_empty() || channels[0].is_empty() {
        return Err(PausecutError::DecodeFailed {
            reason: "stream decoded to zero frames".to_string(),
            source: None,
        });
    }

    debug!(
        "decoded {} frames x {} channels at {} Hz",
        channels[0].len(),
        channels.len(),
        sample_rate
    );

    SampleBuffer::from_channels(channels, sample_rate)
}

/// Map a MIME subtype to a file extension hint for the format probe.
fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        "audio/ogg" | "audio/vorbis" => Some("ogg"),
        "audio/aac" | "audio/aacp" => Some("aac"),
        "audio/mp4" | "audio/x-m4a" => Some("m4a"),
        _ => None,
    }
}

/// Guess the MIME type of a local file from its extension.
///
/// Used by the CLI, which has a path instead of a browser-supplied type.
/// Unknown extensions map to `application/octet-stream` and are rejected
/// by [`decode`] like any other non-audio upload.
pub fn guess_mime(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("aac") => "audio/aac",
        Some("m4a") | Some("mp4") => "audio/mp4",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_audio_mime_before_parsing() {
        // Bytes are valid WAV, but the claimed type wins.
        let wav = crate::audio::wav::encode(&SampleBuffer::new(1, 100, 8000)).unwrap();
        let err = decode(&wav, "video/mp4").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_MEDIA");
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        let err = decode(&[0u8; 64], "audio/wav").unwrap_err();
        assert_eq!(err.error_code(), "DECODE_FAILED");
    }

    #[test]
    fn test_decodes_wav_round_trip() {
        let mut original = SampleBuffer::new(2, 4800, 48000);
        for (i, sample) in original.channel_mut(0).iter_mut().enumerate() {
            *sample = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin();
        }
        let wav = crate::audio::wav::encode(&original).unwrap();

        let decoded = decode(&wav, "audio/wav").unwrap();
        assert_eq!(decoded.sample_rate(), 48000);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.frame_count(), 4800);

        // 16-bit quantization bounds the error.
        for (a, b) in original.channel(0).iter().zip(decoded.channel(0)) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("talk.mp3")), "audio/mpeg");
        assert_eq!(guess_mime(Path::new("talk.WAV")), "audio/wav");
        assert_eq!(guess_mime(Path::new("talk.txt")), "application/octet-stream");
    }
}
