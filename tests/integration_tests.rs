//! Integration tests for the speaking-rate batch pipeline

use std::fs;
use std::path::{Path, PathBuf};

use speaking_rate::{
    analyze_file, run_batch, AnalysisConfig, AnalysisError, BatchConfig, BatchStatus,
    ConsoleFileSink, ReportFormat,
};

const SAMPLE_RATE: u32 = 16000;

/// Write mono f32 samples as a 16-bit PCM WAV file
fn write_wav(path: &Path, samples: &[f32], channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(v).expect("write sample");
        }
    }
    writer.finalize().expect("finalize wav");
}

/// Full-scale bursts of `burst_seconds` at the given start times
fn burst_train(duration_seconds: f32, starts: &[f32], burst_seconds: f32) -> Vec<f32> {
    let n = (duration_seconds * SAMPLE_RATE as f32) as usize;
    let burst_len = (burst_seconds * SAMPLE_RATE as f32) as usize;
    let mut samples = vec![0.0f32; n];
    for &start in starts {
        let s = (start * SAMPLE_RATE as f32) as usize;
        for x in samples.iter_mut().skip(s).take(burst_len) {
            *x = 1.0;
        }
    }
    samples
}

fn five_bursts() -> Vec<f32> {
    burst_train(3.0, &[0.2, 0.8, 1.4, 2.0, 2.6], 0.05)
}

fn batch_config(input_dir: &Path, output_path: PathBuf) -> BatchConfig {
    BatchConfig {
        input_dir: input_dir.to_path_buf(),
        output_path,
        ..Default::default()
    }
}

#[test]
fn test_five_burst_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bursts.wav");
    write_wav(&path, &five_bursts(), 1);

    let metrics = analyze_file(&path, &AnalysisConfig::default()).expect("analysis should succeed");
    assert!((metrics.duration_seconds - 3.0).abs() < 1e-3);
    assert_eq!(metrics.pulse_count, 5);
    assert!((metrics.speaking_rate - 5.0 / 3.0).abs() < 1e-3);
    assert!(metrics.avg_energy > 0.02 && metrics.avg_energy <= 1.0);
}

#[test]
fn test_stereo_file_is_downmixed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo.wav");
    write_wav(&path, &five_bursts(), 2);

    let metrics = analyze_file(&path, &AnalysisConfig::default()).unwrap();
    assert!((metrics.duration_seconds - 3.0).abs() < 1e-3);
    assert_eq!(metrics.pulse_count, 5);
}

#[test]
fn test_silent_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    write_wav(&path, &vec![0.0; 2 * SAMPLE_RATE as usize], 1);

    let metrics = analyze_file(&path, &AnalysisConfig::default()).unwrap();
    assert!((metrics.duration_seconds - 2.0).abs() < 1e-3);
    assert_eq!(metrics.pulse_count, 0);
    assert_eq!(metrics.speaking_rate, 0.0);
    assert_eq!(metrics.avg_energy, 0.0);
}

#[test]
fn test_batch_with_corrupt_file() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output_path = out.path().join("results.txt");

    write_wav(&input.path().join("one.wav"), &five_bursts(), 1);
    write_wav(&input.path().join("two.wav"), &vec![0.0; SAMPLE_RATE as usize], 1);
    fs::write(input.path().join("broken.wav"), b"\x00\x01 definitely not audio").unwrap();
    fs::write(input.path().join("notes.txt"), "ignored").unwrap();

    let config = batch_config(input.path(), output_path.clone());
    let mut sink = ConsoleFileSink::new(Vec::new(), &output_path, ReportFormat::Table);
    let report = run_batch(&config, &mut sink).expect("batch should run");

    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!(report.files_found, 3);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "broken.wav");
    assert!(report.sink_error.is_none());

    let one = report.records.iter().find(|r| r.file_name == "one.wav").unwrap();
    assert_eq!(one.duration_seconds, 3.0);
    assert_eq!(one.speaking_rate, 1.67);
    assert!(one.avg_energy.is_some());

    let two = report.records.iter().find(|r| r.file_name == "two.wav").unwrap();
    assert_eq!(two.speaking_rate, 0.0);
    assert_eq!(two.avg_energy, Some(0.0));

    let saved = fs::read_to_string(&output_path).unwrap();
    assert!(saved.contains("File Name"));
    assert!(saved.contains("Avg Energy (Non-Silent)"));
    assert!(saved.contains("one.wav"));
    assert!(saved.contains("two.wav"));
    assert!(!saved.contains("broken.wav"));
    assert!(saved.contains("1.67"));

    let console = String::from_utf8(sink.into_console()).unwrap();
    assert!(console.contains(&saved));
}

#[test]
fn test_batch_missing_directory_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let output_path = out.path().join("results.txt");
    let config = batch_config(&out.path().join("does_not_exist"), output_path.clone());

    let mut sink = ConsoleFileSink::new(Vec::new(), &output_path, ReportFormat::Table);
    let report = run_batch(&config, &mut sink).unwrap();

    assert_eq!(report.status, BatchStatus::MissingInputDirectory);
    assert!(report.records.is_empty());
    assert!(!output_path.exists());
    assert!(sink.into_console().is_empty());
}

#[test]
fn test_batch_empty_directory_writes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output_path = input.path().join("results.txt");
    let config = batch_config(input.path(), output_path.clone());

    let mut sink = ConsoleFileSink::new(Vec::new(), &output_path, ReportFormat::Table);
    let report = run_batch(&config, &mut sink).unwrap();

    assert_eq!(report.status, BatchStatus::NoFilesFound);
    assert!(!output_path.exists());
}

#[test]
fn test_batch_json_lines_parallel() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output_path = out.path().join("results.jsonl");

    for i in 0..4 {
        write_wav(&input.path().join(format!("take_{i}.wav")), &five_bursts(), 1);
    }

    let config = BatchConfig {
        jobs: 2,
        format: ReportFormat::JsonLines,
        ..batch_config(input.path(), output_path.clone())
    };
    let mut sink = ConsoleFileSink::new(Vec::new(), &output_path, config.format);
    let report = run_batch(&config, &mut sink).unwrap();
    assert_eq!(report.records.len(), 4);

    let saved = fs::read_to_string(&output_path).unwrap();
    let rows: Vec<serde_json::Value> = saved
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 4);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row["file"], format!("take_{i}.wav"));
        assert!((row["speaking_rate"].as_f64().unwrap() - 1.67).abs() < 1e-4);
        assert!(row.get("avg_energy").is_some());
    }
}

#[test]
fn test_batch_unwritable_output_still_completes() {
    let input = tempfile::tempdir().unwrap();
    write_wav(&input.path().join("one.wav"), &five_bursts(), 1);

    // Output path is an existing directory
    let output_path = input.path().to_path_buf();
    let config = batch_config(input.path(), output_path.clone());
    let mut sink = ConsoleFileSink::new(Vec::new(), &output_path, ReportFormat::Table);
    let report = run_batch(&config, &mut sink).unwrap();

    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!(report.records.len(), 1);
    assert!(matches!(report.sink_error, Some(AnalysisError::IoError(_))));

    let console = String::from_utf8(sink.into_console()).unwrap();
    assert!(console.contains("one.wav"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let input = tempfile::tempdir().unwrap();
    let mut config = batch_config(input.path(), input.path().join("results.txt"));
    config.analysis.hop_size = 0;

    let mut sink = ConsoleFileSink::new(Vec::new(), input.path().join("results.txt"), ReportFormat::Table);
    assert!(matches!(
        run_batch(&config, &mut sink),
        Err(AnalysisError::InvalidInput(_))
    ));
}
