//! Feature extraction modules
//!
//! - Energy envelope (RMS + normalization)
//! - Pulse detection (peak picking)

pub mod envelope;
pub mod pulses;
