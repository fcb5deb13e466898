//! Analysis result types

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;

/// Full-precision metrics for one recording
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechMetrics {
    /// Duration in seconds (`samples / sample_rate`)
    pub duration_seconds: f32,

    /// Number of detected pulses
    pub pulse_count: usize,

    /// Pulses per second, 0.0 for zero-length audio
    pub speaking_rate: f32,

    /// Mean normalized energy over frames above the silence threshold,
    /// 0.0 if no frame exceeds it
    pub avg_energy: f32,

    /// Diagnostic details
    pub metadata: AnalysisMetadata,
}

/// One row of the batch report
///
/// Values are rounded once, when the record is built from [`SpeechMetrics`]:
/// duration and rate to 2 decimals, energy to 4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// File name without directory
    #[serde(rename = "file")]
    pub file_name: String,

    /// Duration in seconds
    #[serde(rename = "duration_sec")]
    pub duration_seconds: f32,

    /// Pulses per second
    pub speaking_rate: f32,

    /// Silence-gated average energy, when enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_energy: Option<f32>,
}

impl AnalysisRecord {
    /// Build the report row for a file, applying display rounding
    ///
    /// # Example
    ///
    /// ```
    /// use speaking_rate::{AnalysisRecord, SpeechMetrics};
    /// use speaking_rate::analysis::metadata::AnalysisMetadata;
    ///
    /// let metrics = SpeechMetrics {
    ///     duration_seconds: 3.0,
    ///     pulse_count: 5,
    ///     speaking_rate: 5.0 / 3.0,
    ///     avg_energy: 0.123456,
    ///     metadata: AnalysisMetadata::default(),
    /// };
    /// let record = AnalysisRecord::from_metrics("take.wav", &metrics, true);
    /// assert_eq!(record.speaking_rate, 1.67);
    /// assert_eq!(record.avg_energy, Some(0.1235));
    /// ```
    pub fn from_metrics(file_name: &str, metrics: &SpeechMetrics, include_avg_energy: bool) -> Self {
        Self {
            file_name: file_name.to_string(),
            duration_seconds: round_to(metrics.duration_seconds, 2),
            speaking_rate: round_to(metrics.speaking_rate, 2),
            avg_energy: include_avg_energy.then(|| round_to(metrics.avg_energy, 4)),
        }
    }
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f32, decimals: u32) -> f32 {
    let scale = 10f64.powi(decimals as i32);
    ((value as f64 * scale).round() / scale) as f32
}
