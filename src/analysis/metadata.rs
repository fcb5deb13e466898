//! Analysis metadata structures

/// Diagnostic details recorded alongside the per-file metrics
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisMetadata {
    /// Algorithm version
    pub algorithm_version: String,

    /// Sample rate of the analysed waveform in Hz
    pub sample_rate: u32,

    /// Number of envelope frames
    pub num_frames: usize,

    /// Seconds between consecutive envelope frames
    pub frame_duration_seconds: f32,

    /// Minimum pulse spacing actually applied, in frames
    pub min_distance_frames: usize,

    /// Pulse positions in seconds (frame index * frame duration)
    pub pulse_times: Vec<f32>,

    /// Wall-clock time spent in the pipeline, excluding decoding
    pub processing_time_ms: f32,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            sample_rate: 0,
            num_frames: 0,
            frame_duration_seconds: 0.0,
            min_distance_frames: 1,
            pulse_times: vec![],
            processing_time_ms: 0.0,
        }
    }
}
