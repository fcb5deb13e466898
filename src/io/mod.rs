//! Audio I/O modules
//!
//! Input discovery and audio decoding using Symphonia.

pub mod decoder;
pub mod discovery;
pub mod waveform;

pub use decoder::decode_audio;
pub use discovery::{file_name, find_audio_files};
pub use waveform::Waveform;
