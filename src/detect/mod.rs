//! Pause detection boundary
//!
//! Detection is the only network-bound, potentially long-running operation
//! in the pipeline. It sits behind the [`PauseDetector`] trait so the
//! editor never cares whether stamps came from the inference bridge or the
//! offline energy scan, and it is cancellable through a [`CancelToken`]
//! handed down from the session owner.

pub mod bridge;
pub mod energy;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PausecutError, Result};

pub use bridge::BridgeDetector;
pub use energy::EnergyDetector;

/// Ceiling on media sent to detection; the inference collaborator rejects
/// anything larger, so we fail fast before the call.
pub const MAX_MEDIA_BYTES: u64 = 20 * 1024 * 1024;

/// Valid range for the minimum-pause-duration threshold, in seconds.
pub const MIN_PAUSE_RANGE: (f64, f64) = (0.1, 3.0);

/// A candidate silence interval reported by a detector, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauseStamp {
    pub start: f64,
    pub end: f64,
}

/// Cancellation handle for an in-flight detection call.
///
/// Cloning shares the flag; the session owner keeps one clone and hands
/// the other down to the detector.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Boundary contract for pause detection.
pub trait PauseDetector {
    /// Detect silence intervals longer than `min_pause_secs` in the media.
    ///
    /// An empty result means "no pauses found", not an error. Failures of
    /// the collaborator surface as `DetectionFailed` and are retryable by
    /// the caller; a tripped cancel token surfaces as `Cancelled`.
    fn detect(
        &self,
        media: &[u8],
        mime: &str,
        min_pause_secs: f64,
        cancel: &CancelToken,
    ) -> Result<Vec<PauseStamp>>;

    /// Human-readable detector name for logging.
    fn name(&self) -> &'static str;
}

/// Reject media above the detection size ceiling.
pub fn check_media_size(len: usize) -> Result<()> {
    if len as u64 > MAX_MEDIA_BYTES {
        return Err(PausecutError::FileTooLarge {
            size_bytes: len as u64,
            limit_bytes: MAX_MEDIA_BYTES,
        });
    }
    Ok(())
}

/// Clamp a requested threshold into the supported range.
pub fn clamp_min_pause(secs: f64) -> f64 {
    secs.clamp(MIN_PAUSE_RANGE.0, MIN_PAUSE_RANGE.1)
}

/// Validate stamps returned by a collaborator.
///
/// A stamp with a negative start or a non-positive length means the
/// response was malformed, not merely empty.
pub(crate) fn validate_stamps(stamps: &[PauseStamp]) -> Result<()> {
    for stamp in stamps {
        if !(stamp.start >= 0.0 && stamp.end > stamp.start) {
            return Err(PausecutError::DetectionFailed {
                reason: format!(
                    "malformed interval in response: start={} end={}",
                    stamp.start, stamp.end
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_ceiling() {
        assert!(check_media_size(1024).is_ok());
        assert!(check_media_size(MAX_MEDIA_BYTES as usize).is_ok());

        let err = check_media_size(MAX_MEDIA_BYTES as usize + 1).unwrap_err();
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn test_min_pause_clamping() {
        assert_eq!(clamp_min_pause(0.0), 0.1);
        assert_eq!(clamp_min_pause(0.5), 0.5);
        assert_eq!(clamp_min_pause(10.0), 3.0);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_stamp_validation() {
        assert!(validate_stamps(&[PauseStamp { start: 0.5, end: 1.0 }]).is_ok());
        assert!(validate_stamps(&[PauseStamp { start: 1.0, end: 1.0 }]).is_err());
        assert!(validate_stamps(&[PauseStamp { start: -0.1, end: 1.0 }]).is_err());
    }
}
