//! Energy envelope extraction
//!
//! - RMS envelope at a fixed hop length
//! - Min-max normalization to [0, 1]

pub mod normalization;
pub mod rms;

pub use normalization::normalize_envelope;
pub use rms::{frame_count, frame_duration, rms_envelope, Framing};
