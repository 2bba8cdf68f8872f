//! Error handling for Pausecut
//!
//! Decode and detection failures abort the transition into the editor;
//! export failures leave the editing session intact so the caller can retry.

use thiserror::Error;

/// Result type alias for Pausecut operations
pub type Result<T> = std::result::Result<T, PausecutError>;

/// Main error type for Pausecut operations
#[derive(Error, Debug)]
pub enum PausecutError {
    // Upload errors
    #[error("Unsupported media type: {mime} (expected audio/*)")]
    UnsupportedMedia { mime: String },

    #[error("File too large: {size_bytes} bytes (limit {limit_bytes})")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    // Decode errors
    #[error("Failed to decode audio: {reason}")]
    DecodeFailed {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Detection boundary errors
    #[error("Pause detection failed: {reason}")]
    DetectionFailed { reason: String },

    #[error("Pause detection cancelled")]
    Cancelled,

    // Export errors
    #[error("Export failed: {reason}")]
    ExportFailed { reason: String },

    // Project errors
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    #[error("Media does not match project: {reason}")]
    MediaMismatch { reason: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PausecutError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            PausecutError::UnsupportedMedia { .. } => "UNSUPPORTED_MEDIA",
            PausecutError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            PausecutError::DecodeFailed { .. } => "DECODE_FAILED",
            PausecutError::DetectionFailed { .. } => "DETECTION_FAILED",
            PausecutError::Cancelled => "CANCELLED",
            PausecutError::ExportFailed { .. } => "EXPORT_FAILED",
            PausecutError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            PausecutError::MediaMismatch { .. } => "MEDIA_MISMATCH",
            PausecutError::Io(_) => "IO_ERROR",
            PausecutError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the user can retry the same operation without starting over
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PausecutError::DetectionFailed { .. }
                | PausecutError::ExportFailed { .. }
                | PausecutError::MediaMismatch { .. }
                | PausecutError::Cancelled
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            PausecutError::UnsupportedMedia { .. } => vec![
                "Select a file with an audio/* media type",
                "Supported uploads: WAV, MP3, FLAC, OGG, AAC",
            ],
            PausecutError::FileTooLarge { .. } => vec![
                "Upload a file under 20 MB",
                "Trim or re-encode the audio at a lower bitrate first",
            ],
            PausecutError::DecodeFailed { .. } => vec![
                "Check if the file plays in another application",
                "Try converting the file to WAV format first",
            ],
            PausecutError::DetectionFailed { .. } => vec![
                "Retry detection; the service may be temporarily busy",
                "Run with --local to use the offline energy detector",
            ],
            PausecutError::ExportFailed { .. } => vec![
                "Your edits are preserved; retry the export",
                "Check free disk space for the output file",
            ],
            PausecutError::MediaMismatch { .. } => {
                vec!["Re-upload the exact file this project was created from"]
            }
            _ => vec![],
        }
    }
}
