//! Editing session
//!
//! [`EditorSession`] owns the decoded sample buffer and the pause registry
//! for one uploaded file and drives the decode → detect → toggle → splice
//! → encode pipeline. The splice/export path is synchronous and works on a
//! read-only view of the buffer; detection is the only long-running call
//! and takes a cancel token.

pub mod registry;
pub mod splice;
pub mod waveform;

use image::RgbaImage;
use log::info;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::audio::{self, SampleBuffer};
use crate::detect::{self, CancelToken, PauseDetector};
use crate::error::{PausecutError, Result};
use crate::state::ProjectData;

pub use registry::{PauseInterval, PauseRegistry};
pub use splice::{retained_segments, splice, RetainedSegment};
pub use waveform::{render_waveform, WaveformView, MAX_ZOOM, MIN_ZOOM};

/// Default minimum pause duration in seconds.
pub const DEFAULT_MIN_PAUSE_SECS: f64 = 0.5;

/// One editing session: a decoded upload plus its pause registry.
#[derive(Debug)]
pub struct EditorSession {
    media: Vec<u8>,
    media_name: String,
    media_type: String,
    media_sha256: String,
    buffer: SampleBuffer,
    registry: PauseRegistry,
    min_pause_secs: f64,
    zoom: f32,
}

impl EditorSession {
    /// Open a session by decoding an uploaded media blob.
    ///
    /// Enforces the upload size ceiling and the `audio/*` MIME gate, then
    /// decodes. On failure the caller stays at the upload stage.
    pub fn open(media: Vec<u8>, name: &str, mime: &str, min_pause_secs: f64) -> Result<Self> {
        detect::check_media_size(media.len())?;
        let buffer = audio::decode(&media, mime)?;
        info!(
            "opened session for '{}': {:.2}s, {} channel(s) at {} Hz",
            name,
            buffer.duration(),
            buffer.channel_count(),
            buffer.sample_rate()
        );

        Ok(Self {
            media_sha256: sha256_hex(&media),
            media,
            media_name: name.to_string(),
            media_type: mime.to_string(),
            buffer,
            registry: PauseRegistry::new(),
            min_pause_secs: detect::clamp_min_pause(min_pause_secs),
            zoom: MIN_ZOOM,
        })
    }

    /// Resume a session from a persisted project record.
    ///
    /// Raw samples are never persisted, so the caller re-supplies the
    /// original file; a digest mismatch is rejected before any interval is
    /// applied to the wrong audio.
    pub fn resume(record: &ProjectData, media: Vec<u8>) -> Result<Self> {
        let mut session = Self::open(
            media,
            &record.media_file_name,
            &record.media_type,
            record.min_pause_duration,
        )?;
        if let Some(expected) = &record.media_sha256 {
            if *expected != session.media_sha256 {
                return Err(PausecutError::MediaMismatch {
                    reason: format!(
                        "digest of the supplied file does not match '{}'",
                        record.media_file_name
                    ),
                });
            }
        }
        session.registry.restore(record.pauses.clone());
        Ok(session)
    }

    /// Run pause detection and load the registry with the result.
    ///
    /// Returns the number of detected pauses. Detection failures leave the
    /// registry untouched so a retry needs no re-upload.
    pub fn detect_pauses(
        &mut self,
        detector: &dyn PauseDetector,
        cancel: &CancelToken,
    ) -> Result<usize> {
        info!("detecting pauses >= {:.1}s via {}", self.min_pause_secs, detector.name());
        let stamps = detector.detect(&self.media, &self.media_type, self.min_pause_secs, cancel)?;
        let count = stamps.len();
        self.registry.load(stamps);
        Ok(count)
    }

    /// Flip the removal flag of one interval; silent no-op for stale ids.
    pub fn toggle(&mut self, id: Uuid) {
        self.registry.toggle(id);
    }

    /// Set the rendering zoom factor, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn pauses(&self) -> &[PauseInterval] {
        self.registry.snapshot()
    }

    pub fn registry_mut(&mut self) -> &mut PauseRegistry {
        &mut self.registry
    }

    pub fn media_name(&self) -> &str {
        &self.media_name
    }

    pub fn min_pause_secs(&self) -> f64 {
        self.min_pause_secs
    }

    /// Render the current waveform with removal bands at the session zoom.
    pub fn waveform(&self, width: u32, height: u32) -> RgbaImage {
        render_waveform(
            &self.buffer,
            self.registry.snapshot(),
            width,
            height,
            self.zoom,
        )
    }

    /// Splice out the removal-marked intervals into a new buffer.
    ///
    /// The session keeps its own buffer untouched.
    pub fn splice(&self) -> SampleBuffer {
        splice(&self.buffer, self.registry.snapshot())
    }

    /// Splice and encode to WAV bytes plus the suggested download name.
    ///
    /// Failures leave the session state intact for a retry.
    pub fn export_wav(&self) -> Result<(Vec<u8>, String)> {
        let spliced = self.splice();
        let bytes = audio::encode(&spliced)?;
        info!(
            "exported {:.2}s ({} bytes) of {:.2}s source",
            spliced.duration(),
            bytes.len(),
            self.buffer.duration()
        );
        Ok((bytes, audio::export_file_name(&self.media_name)))
    }

    /// Snapshot the session as a persistable project record payload.
    ///
    /// Only metadata and intervals are captured, never raw samples.
    pub fn to_project_data(&self) -> ProjectData {
        ProjectData {
            media_file_name: self.media_name.clone(),
            media_type: self.media_type.clone(),
            media_url: None,
            media_sha256: Some(self.media_sha256.clone()),
            pauses: self.registry.snapshot().to_vec(),
            min_pause_duration: self.min_pause_secs,
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
