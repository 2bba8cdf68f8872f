//! Inference bridge detector
//!
//! Sends the raw media to the pause-detection inference service and parses
//! the returned silence intervals. Transient failures (rate limiting,
//! server errors, transport errors) are retried with exponential backoff;
//! anything else fails immediately.

use std::env;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{info, warn};
use serde::Serialize;

use crate::detect::{check_media_size, clamp_min_pause, validate_stamps, CancelToken, PauseDetector, PauseStamp};
use crate::error::{PausecutError, Result};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 2000;
const DEFAULT_BRIDGE_URL: &str = "http://localhost:8001";
const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// Request payload sent to the bridge.
#[derive(Debug, Serialize)]
struct DetectRequest {
    media_base64: String,
    mime_type: String,
    min_pause_seconds: f64,
}

/// Pause detector backed by the HTTP inference bridge.
pub struct BridgeDetector {
    url: String,
    timeout_ms: u64,
}

impl BridgeDetector {
    /// Create a detector configured from the environment.
    ///
    /// Reads `PAUSECUT_BRIDGE_URL` and `PAUSECUT_BRIDGE_TIMEOUT_MS`,
    /// falling back to localhost defaults.
    pub fn new() -> Self {
        let url = env::var("PAUSECUT_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.into());
        let timeout_ms = env::var("PAUSECUT_BRIDGE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self { url, timeout_ms }
    }

    /// Create a detector with an explicit endpoint.
    pub fn with_config(url: String, timeout_ms: u64) -> Self {
        Self { url, timeout_ms }
    }

    /// Whether a bridge endpoint has been configured explicitly.
    pub fn is_configured() -> bool {
        env::var("PAUSECUT_BRIDGE_URL").is_ok()
    }

    fn endpoint(&self) -> String {
        format!("{}/detect-pauses", self.url.trim_end_matches('/'))
    }

    fn call_once(&self, request: &DetectRequest) -> std::result::Result<Vec<PauseStamp>, CallError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| CallError::Fatal(format!("failed to build HTTP client: {}", e)))?;

        let response = client
            .post(self.endpoint())
            .json(request)
            .send()
            .map_err(|e| CallError::Transient(format!("transport error: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(CallError::Transient(format!("bridge returned {}", status)));
        }
        if !status.is_success() {
            return Err(CallError::Fatal(format!("bridge returned {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| CallError::Transient(format!("failed to read response: {}", e)))?;

        // An empty body means "no pauses found".
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(body.trim())
            .map_err(|e| CallError::Fatal(format!("malformed response: {}", e)))
    }
}

impl Default for BridgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

enum CallError {
    /// Worth retrying: rate limit, server error, transport failure.
    Transient(String),
    /// Not worth retrying: client error, unparseable response.
    Fatal(String),
}

impl PauseDetector for BridgeDetector {
    fn detect(
        &self,
        media: &[u8],
        mime: &str,
        min_pause_secs: f64,
        cancel: &CancelToken,
    ) -> Result<Vec<PauseStamp>> {
        check_media_size(media.len())?;

        let request = DetectRequest {
            media_base64: BASE64.encode(media),
            mime_type: mime.to_string(),
            min_pause_seconds: clamp_min_pause(min_pause_secs),
        };

        let mut last_reason = String::new();
        for attempt in 0..MAX_RETRIES {
            if cancel.is_cancelled() {
                return Err(PausecutError::Cancelled);
            }

            match self.call_once(&request) {
                Ok(stamps) => {
                    validate_stamps(&stamps)?;
                    info!(
                        "bridge returned {} pause(s) on attempt {}",
                        stamps.len(),
                        attempt + 1
                    );
                    return Ok(stamps);
                }
                Err(CallError::Fatal(reason)) => {
                    return Err(PausecutError::DetectionFailed { reason });
                }
                Err(CallError::Transient(reason)) => {
                    last_reason = reason;
                    if attempt + 1 < MAX_RETRIES {
                        let backoff = INITIAL_BACKOFF_MS << attempt;
                        warn!(
                            "detection attempt {}/{} failed ({}); retrying in {} ms",
                            attempt + 1,
                            MAX_RETRIES,
                            last_reason,
                            backoff
                        );
                        std::thread::sleep(Duration::from_millis(backoff));
                    }
                }
            }
        }

        Err(PausecutError::DetectionFailed {
            reason: format!("all {} attempts failed: {}", MAX_RETRIES, last_reason),
        })
    }

    fn name(&self) -> &'static str {
        "inference-bridge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let detector = BridgeDetector::with_config("http://host:9000/".into(), 1000);
        assert_eq!(detector.endpoint(), "http://host:9000/detect-pauses");
    }

    #[test]
    fn test_oversized_media_rejected_before_any_call() {
        let detector = BridgeDetector::with_config("http://unreachable.invalid".into(), 10);
        let media = vec![0u8; (crate::detect::MAX_MEDIA_BYTES + 1) as usize];
        let err = detector
            .detect(&media, "audio/wav", 0.5, &CancelToken::new())
            .unwrap_err();
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn test_cancelled_token_short_circuits() {
        let detector = BridgeDetector::with_config("http://unreachable.invalid".into(), 10);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = detector
            .detect(&[0u8; 16], "audio/wav", 0.5, &cancel)
            .unwrap_err();
        assert_eq!(err.error_code(), "CANCELLED");
    }
}
