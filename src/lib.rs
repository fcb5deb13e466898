//! # Speaking Rate
//!
//! Speaking-rate and vocal energy estimation for recorded speech.
//!
//! ## Features
//!
//! - **Energy Envelope**: Short-time RMS at a fixed hop, min-max normalized
//! - **Pulse Detection**: Peak picking with an amplitude floor and minimum spacing
//!   as a proxy for syllabic nuclei
//! - **Metrics**: Duration, pulses per second, silence-gated average energy
//! - **Batch Processing**: Directory scan with per-file failure isolation, optional
//!   parallel workers and per-file timeouts, text table or JSON-lines report
//!
//! ## Quick Start
//!
//! ```no_run
//! use speaking_rate::{analyze_speech, AnalysisConfig};
//!
//! // Load audio samples (mono, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 16000;
//!
//! let metrics = analyze_speech(&samples, sample_rate, &AnalysisConfig::default())?;
//!
//! println!("Duration: {:.2}s", metrics.duration_seconds);
//! println!("Rate: {:.2} syllables/s ({} pulses)", metrics.speaking_rate, metrics.pulse_count);
//! # Ok::<(), speaking_rate::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio File → Decode (mono) → RMS Envelope → Normalize → Pulse Detection → Metrics → Report
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod report;

use std::path::Path;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::result::{AnalysisRecord, SpeechMetrics};
pub use batch::{run_batch, BatchReport, BatchStatus, FileFailure};
pub use config::{AnalysisConfig, BatchConfig};
pub use error::AnalysisError;
pub use io::Waveform;
pub use report::{ConsoleFileSink, ReportFormat, ReportSink};

/// Main analysis function
///
/// Runs the full pipeline on mono samples: RMS envelope, normalization, pulse
/// detection and metrics. Results are full precision; rounding happens when an
/// [`AnalysisRecord`] is built.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// Returns `AnalysisError` if the configuration or sample rate is invalid, or if
/// the signal contains non-finite values
///
/// # Example
///
/// ```
/// use speaking_rate::{analyze_speech, AnalysisConfig};
///
/// let samples = vec![0.0f32; 16000 * 2]; // 2 seconds of silence
/// let metrics = analyze_speech(&samples, 16000, &AnalysisConfig::default())?;
/// assert_eq!(metrics.pulse_count, 0);
/// assert_eq!(metrics.speaking_rate, 0.0);
/// # Ok::<(), speaking_rate::AnalysisError>(())
/// ```
pub fn analyze_speech(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<SpeechMetrics, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting speech analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    config.validate()?;

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    let duration_seconds = samples.len() as f32 / sample_rate as f32;

    // 1. Energy envelope
    use features::envelope::{frame_duration, normalize_envelope, rms_envelope};
    let envelope = rms_envelope(samples, config.frame_size, config.hop_size, config.framing)?;

    // 2. Normalization (constant envelopes pass through)
    let normalized = normalize_envelope(&envelope)?;
    debug_assert_eq!(envelope.len(), normalized.len());

    // 3. Pulse detection
    use features::pulses::{detect_pulses, min_distance_frames};
    let frame_seconds = frame_duration(config.hop_size, sample_rate);
    let min_distance = min_distance_frames(
        config.min_peak_distance_seconds,
        config.hop_size,
        sample_rate,
        config.strict_peak_spacing,
    );
    let pulses = detect_pulses(&normalized, config.min_peak_height, min_distance);

    // 4. Metrics
    use analysis::metrics::{silence_gated_energy, speaking_rate};
    let rate = speaking_rate(pulses.len(), duration_seconds);
    let avg_energy = silence_gated_energy(&normalized, config.min_peak_height);

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Analysis done: {:.2}s, {} frames, {} pulses, rate={:.3}/s, energy={:.4}",
        duration_seconds,
        normalized.len(),
        pulses.len(),
        rate,
        avg_energy
    );

    Ok(SpeechMetrics {
        duration_seconds,
        pulse_count: pulses.len(),
        speaking_rate: rate,
        avg_energy,
        metadata: AnalysisMetadata {
            sample_rate,
            num_frames: normalized.len(),
            frame_duration_seconds: frame_seconds,
            min_distance_frames: min_distance,
            pulse_times: pulses.iter().map(|&i| i as f32 * frame_seconds).collect(),
            processing_time_ms,
            ..Default::default()
        },
    })
}

/// Analyse an already decoded waveform
pub fn analyze_waveform(
    waveform: &Waveform,
    config: &AnalysisConfig,
) -> Result<SpeechMetrics, AnalysisError> {
    analyze_speech(waveform.samples(), waveform.sample_rate(), config)
}

/// Decode an audio file and analyse it
///
/// # Errors
///
/// Returns the decoding error (`IoError`, `DecodingError`) or any analysis error
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<SpeechMetrics, AnalysisError> {
    let waveform = io::decode_audio(path)?;
    analyze_waveform(&waveform, config)
}
