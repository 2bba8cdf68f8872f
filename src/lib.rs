//! Pausecut - silence detection and removal for audio files
//!
//! Pausecut decodes an uploaded audio file into raw samples, asks a pause
//! detector for candidate silence intervals, lets the caller toggle each
//! interval between "remove" and "keep", splices the retained ranges into
//! a new contiguous buffer and encodes the result as 16-bit PCM WAV.
//!
//! # Pipeline
//!
//! upload -> [`audio::decode`] -> [`detect::PauseDetector`] ->
//! [`editor::PauseRegistry`] -> [`editor::splice`] -> [`audio::encode`]
//!
//! The whole flow is driven by an [`editor::EditorSession`], which owns
//! the decoded buffer; splicing returns a brand-new buffer and never
//! mutates session state.

pub mod audio;
pub mod cli;
pub mod detect;
pub mod editor;
pub mod error;
pub mod state;

pub use editor::EditorSession;
pub use error::{PausecutError, Result};
