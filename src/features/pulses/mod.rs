//! Syllable-like pulse detection
//!
//! Finds energy peaks in the normalized envelope under an amplitude floor and a
//! minimum spacing. The pulse count drives the speaking-rate metric.

pub mod peak_picking;

pub use peak_picking::{detect_pulses, min_distance_frames};
