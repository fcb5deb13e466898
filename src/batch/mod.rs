//! Directory batch driver
//!
//! Discovers recordings, runs the per-file pipeline with failure isolation and
//! hands the resulting records to a [`ReportSink`].
//!
//! Parallelism is across files (batch-level); each file's analysis is still
//! single-threaded. With `jobs = 1` files are processed sequentially.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use rayon::prelude::*;

use crate::analysis::result::{AnalysisRecord, SpeechMetrics};
use crate::config::{AnalysisConfig, BatchConfig};
use crate::error::AnalysisError;
use crate::io::{file_name, find_audio_files};
use crate::report::ReportSink;

/// How a batch run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Records were produced and handed to the sink
    Completed,
    /// The input directory does not exist
    MissingInputDirectory,
    /// The directory holds no file with the configured extension
    NoFilesFound,
    /// Every file failed, nothing to report
    NoResults,
}

/// A file that could not be analysed
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    /// File name without directory
    pub file_name: String,
    /// Underlying cause
    pub error: AnalysisError,
}

/// Outcome of a batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// How the run ended
    pub status: BatchStatus,
    /// Number of matching files discovered
    pub files_found: usize,
    /// One record per successfully analysed file, in discovery order
    pub records: Vec<AnalysisRecord>,
    /// Files that failed, in discovery order
    pub failures: Vec<FileFailure>,
    /// Set if the sink could not persist the report
    pub sink_error: Option<AnalysisError>,
    /// Wall-clock time of the whole run
    pub wall_time_ms: f32,
}

impl BatchReport {
    fn empty(status: BatchStatus, files_found: usize, started: Instant) -> Self {
        Self {
            status,
            files_found,
            records: vec![],
            failures: vec![],
            sink_error: None,
            wall_time_ms: started.elapsed().as_secs_f32() * 1000.0,
        }
    }
}

/// Analyse every matching file in the configured directory and report the results
///
/// Per-file failures are logged and collected in [`BatchReport::failures`]; they
/// never abort the batch. The sink is only invoked when at least one record was
/// produced. A sink failure is logged and stored in [`BatchReport::sink_error`].
///
/// # Errors
///
/// Returns `AnalysisError` for an invalid configuration, an unreadable input
/// directory, or if the worker pool cannot be created
pub fn run_batch(
    config: &BatchConfig,
    sink: &mut dyn ReportSink,
) -> Result<BatchReport, AnalysisError> {
    config.validate()?;
    let started = Instant::now();

    log::info!("--- Starting Speaking Rate Analysis ---");

    if !config.input_dir.is_dir() {
        log::error!(
            "Directory '{}' not found. Please create it and add .{} files.",
            config.input_dir.display(),
            config.extension.trim_start_matches('.')
        );
        return Ok(BatchReport::empty(
            BatchStatus::MissingInputDirectory,
            0,
            started,
        ));
    }

    let files = find_audio_files(&config.input_dir, &config.extension)?;
    if files.is_empty() {
        log::warn!(
            "No .{} files found in '{}'",
            config.extension.trim_start_matches('.'),
            config.input_dir.display()
        );
        return Ok(BatchReport::empty(BatchStatus::NoFilesFound, 0, started));
    }

    log::info!("Processing {} files (jobs={})...", files.len(), config.jobs);

    let outcomes = analyze_files(&files, config)?;

    let mut records = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(metrics) => {
                log::debug!(
                    "{}: {:.2}s, {} pulses, {:.2} pulses/s",
                    name,
                    metrics.duration_seconds,
                    metrics.pulse_count,
                    metrics.speaking_rate
                );
                records.push(AnalysisRecord::from_metrics(
                    &name,
                    &metrics,
                    config.analysis.include_avg_energy,
                ));
            }
            Err(error) => {
                log::error!("Error processing {}: {}", name, error);
                failures.push(FileFailure {
                    file_name: name,
                    error,
                });
            }
        }
    }

    let files_found = files.len();

    if records.is_empty() {
        log::warn!("No results generated.");
        let mut report = BatchReport::empty(BatchStatus::NoResults, files_found, started);
        report.failures = failures;
        return Ok(report);
    }

    let sink_error = match sink.write(&records) {
        Ok(()) => None,
        Err(e) => {
            log::error!("Error saving report: {}", e);
            Some(e)
        }
    };

    let wall_time_ms = started.elapsed().as_secs_f32() * 1000.0;
    log::info!(
        "Done: ok={}/{} wall={:.0}ms",
        records.len(),
        files_found,
        wall_time_ms
    );

    Ok(BatchReport {
        status: BatchStatus::Completed,
        files_found,
        records,
        failures,
        sink_error,
        wall_time_ms,
    })
}

/// Run the per-file pipeline over a list of paths
///
/// Returns `(file name, outcome)` pairs in input order.
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if the worker pool cannot be built
pub fn analyze_files(
    paths: &[PathBuf],
    config: &BatchConfig,
) -> Result<Vec<(String, Result<SpeechMetrics, AnalysisError>)>, AnalysisError> {
    let run_one = |path: &PathBuf| {
        (
            file_name(path),
            analyze_with_timeout(path, &config.analysis, config.file_timeout),
        )
    };

    if config.jobs <= 1 || paths.len() <= 1 {
        return Ok(paths.iter().map(run_one).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| AnalysisError::ProcessingError(format!("Failed to build thread pool: {e}")))?;

    Ok(pool.install(|| paths.par_iter().map(run_one).collect()))
}

/// Analyse one file, optionally bounded in time
///
/// With a timeout the analysis runs on a helper thread. A helper that overruns
/// is left detached and its late result is dropped.
pub fn analyze_with_timeout(
    path: &Path,
    config: &AnalysisConfig,
    timeout: Option<Duration>,
) -> Result<SpeechMetrics, AnalysisError> {
    let Some(timeout) = timeout else {
        return crate::analyze_file(path, config);
    };

    let (tx, rx) = crossbeam_channel::bounded(1);
    let owned_path = path.to_path_buf();
    let owned_config = config.clone();

    std::thread::Builder::new()
        .name(format!("analyze-{}", file_name(path)))
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(crate::analyze_file(&owned_path, &owned_config));
        })
        .map_err(|e| AnalysisError::ProcessingError(format!("Failed to spawn worker: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(AnalysisError::Timeout(format!(
            "analysis did not finish within {:.1}s",
            timeout.as_secs_f32()
        ))),
        Err(RecvTimeoutError::Disconnected) => Err(AnalysisError::ProcessingError(
            "analysis worker exited without a result".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Captures records instead of printing them
    #[derive(Default)]
    struct CollectingSink {
        calls: usize,
        records: Vec<AnalysisRecord>,
    }

    impl ReportSink for CollectingSink {
        fn write(&mut self, records: &[AnalysisRecord]) -> Result<(), AnalysisError> {
            self.calls += 1;
            self.records.extend_from_slice(records);
            Ok(())
        }
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn write(&mut self, _records: &[AnalysisRecord]) -> Result<(), AnalysisError> {
            Err(AnalysisError::IoError("permission denied".to_string()))
        }
    }

    fn write_tone(path: &Path, seconds: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let n = (seconds * 16000.0) as usize;
        for i in 0..n {
            // 4 Hz amplitude modulation gives a few clear energy peaks
            let t = i as f32 / 16000.0;
            let am = (2.0 * std::f32::consts::PI * 4.0 * t).sin().abs();
            let s = am * (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5;
            writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn batch_config(dir: &Path) -> BatchConfig {
        BatchConfig {
            input_dir: dir.to_path_buf(),
            output_path: dir.join("results.txt"),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_directory() {
        let mut sink = CollectingSink::default();
        let config = BatchConfig {
            input_dir: PathBuf::from("/no/such/input/dir"),
            ..Default::default()
        };
        let report = run_batch(&config, &mut sink).unwrap();
        assert_eq!(report.status, BatchStatus::MissingInputDirectory);
        assert!(report.records.is_empty());
        assert_eq!(sink.calls, 0);
    }

    #[test]
    fn test_no_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "hello").unwrap();

        let mut sink = CollectingSink::default();
        let report = run_batch(&batch_config(dir.path()), &mut sink).unwrap();
        assert_eq!(report.status, BatchStatus::NoFilesFound);
        assert_eq!(sink.calls, 0);
    }

    #[test]
    fn test_all_failures_skip_sink() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.wav"), b"garbage").unwrap();

        let mut sink = CollectingSink::default();
        let report = run_batch(&batch_config(dir.path()), &mut sink).unwrap();
        assert_eq!(report.status, BatchStatus::NoResults);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "bad.wav");
        assert_eq!(sink.calls, 0);
    }

    #[test]
    fn test_failure_isolation_and_order() {
        let dir = tempfile::tempdir().unwrap();
        write_tone(&dir.path().join("a.wav"), 1.0);
        fs::write(dir.path().join("b.wav"), b"not audio at all").unwrap();
        write_tone(&dir.path().join("c.wav"), 2.0);

        for jobs in [1, 3] {
            let mut sink = CollectingSink::default();
            let config = BatchConfig {
                jobs,
                ..batch_config(dir.path())
            };
            let report = run_batch(&config, &mut sink).unwrap();

            assert_eq!(report.status, BatchStatus::Completed);
            assert_eq!(report.files_found, 3);
            let names: Vec<&str> = report.records.iter().map(|r| r.file_name.as_str()).collect();
            assert_eq!(names, vec!["a.wav", "c.wav"]);
            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.failures[0].file_name, "b.wav");
            assert_eq!(sink.calls, 1);
            assert_eq!(sink.records, report.records);
        }
    }

    #[test]
    fn test_sink_failure_does_not_fail_run() {
        let dir = tempfile::tempdir().unwrap();
        write_tone(&dir.path().join("a.wav"), 1.0);

        let report = run_batch(&batch_config(dir.path()), &mut FailingSink).unwrap();
        assert_eq!(report.status, BatchStatus::Completed);
        assert_eq!(report.records.len(), 1);
        assert!(matches!(report.sink_error, Some(AnalysisError::IoError(_))));
    }

    #[test]
    fn test_timeout_path_returns_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        write_tone(&path, 1.0);

        let metrics = analyze_with_timeout(
            &path,
            &AnalysisConfig::default(),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert!((metrics.duration_seconds - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_overrunning_file_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.wav");
        write_tone(&path, 120.0);

        let result = analyze_with_timeout(
            &path,
            &AnalysisConfig::default(),
            Some(Duration::from_nanos(1)),
        );
        assert!(
            matches!(result, Err(AnalysisError::Timeout(_))),
            "expected timeout, got {:?}",
            result
        );
    }

    #[test]
    fn test_timed_out_file_is_reported_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_tone(&dir.path().join("long.wav"), 120.0);

        let mut sink = CollectingSink::default();
        let config = BatchConfig {
            file_timeout: Some(Duration::from_nanos(1)),
            ..batch_config(dir.path())
        };
        let report = run_batch(&config, &mut sink).unwrap();

        assert_eq!(report.status, BatchStatus::NoResults);
        assert!(report.records.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "long.wav");
        assert!(matches!(report.failures[0].error, AnalysisError::Timeout(_)));
        assert_eq!(sink.calls, 0);
    }

    #[test]
    fn test_energy_column_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        write_tone(&dir.path().join("a.wav"), 1.0);

        let mut sink = CollectingSink::default();
        let mut config = batch_config(dir.path());
        config.analysis.include_avg_energy = false;
        let report = run_batch(&config, &mut sink).unwrap();
        assert_eq!(report.records[0].avg_energy, None);
    }
}
