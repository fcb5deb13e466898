//! Configuration parameters for speaking-rate analysis

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AnalysisError;
use crate::features::envelope::Framing;
use crate::report::ReportFormat;

/// Per-file analysis configuration parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    // Envelope
    /// Frame size for the RMS envelope in samples (default: 2048)
    pub frame_size: usize,

    /// Hop size between envelope frames in samples (default: 512)
    pub hop_size: usize,

    /// Boundary convention for the first and last envelope frames (default: Centered)
    pub framing: Framing,

    // Pulse detection
    /// Minimum normalized envelope height for a pulse (default: 0.02)
    /// Also the silence threshold for the average-energy metric
    pub min_peak_height: f32,

    /// Minimum time between two pulses in seconds (default: 0.1)
    pub min_peak_distance_seconds: f32,

    /// Round the minimum pulse distance up to whole frames instead of down (default: false)
    /// With rounding up, adjacent pulses are never closer than `min_peak_distance_seconds`
    pub strict_peak_spacing: bool,

    // Metrics
    /// Report the silence-gated average energy column (default: true)
    pub include_avg_energy: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            framing: Framing::Centered,
            min_peak_height: 0.02,
            min_peak_distance_seconds: 0.1,
            strict_peak_spacing: false,
            include_avg_energy: true,
        }
    }
}

impl AnalysisConfig {
    /// Check that the parameters describe a usable pipeline
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Frame size must be > 0".to_string(),
            ));
        }
        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        if !self.min_peak_height.is_finite() || self.min_peak_height < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Minimum peak height must be a non-negative number, got {}",
                self.min_peak_height
            )));
        }
        if !self.min_peak_distance_seconds.is_finite() || self.min_peak_distance_seconds < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Minimum peak distance must be a non-negative number of seconds, got {}",
                self.min_peak_distance_seconds
            )));
        }
        Ok(())
    }
}

/// Directory-level batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for recordings, not recursed into (default: `wav`)
    pub input_dir: PathBuf,

    /// Where the rendered report is persisted (default: `results.txt`)
    pub output_path: PathBuf,

    /// File extension to pick up, compared case-insensitively (default: `wav`)
    pub extension: String,

    /// Number of files analysed in parallel (default: 1, sequential)
    pub jobs: usize,

    /// Give up on a single file after this long (default: none)
    pub file_timeout: Option<Duration>,

    /// Report rendering (default: aligned text table)
    pub format: ReportFormat,

    /// Per-file pipeline parameters
    pub analysis: AnalysisConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("wav"),
            output_path: PathBuf::from("results.txt"),
            extension: "wav".to_string(),
            jobs: 1,
            file_timeout: None,
            format: ReportFormat::Table,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Check batch parameters and the nested analysis configuration
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.jobs == 0 {
            return Err(AnalysisError::InvalidInput(
                "Job count must be >= 1".to_string(),
            ));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(AnalysisError::InvalidInput(
                "File extension must not be empty".to_string(),
            ));
        }
        if let Some(timeout) = self.file_timeout {
            if timeout.is_zero() {
                return Err(AnalysisError::InvalidInput(
                    "Per-file timeout must be > 0".to_string(),
                ));
            }
        }
        self.analysis.validate()
    }
}
