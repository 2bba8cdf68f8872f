//! Audio primitives: sample buffer, media decoding, WAV encoding.

pub mod buffer;
pub mod decoder;
pub mod wav;

pub use buffer::SampleBuffer;
pub use decoder::{decode, guess_mime};
pub use wav::{encode, export_file_name};
