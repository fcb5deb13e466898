//! Analyze every recording in a directory and report speaking rates
//!
//! Usage:
//!   cargo run --release --bin analyze_dir -- [--input DIR] [--output PATH] [--jobs N] [--json] ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each file analysis is still single-threaded.
//! - Logging goes through `env_logger`; set `RUST_LOG=debug` for per-stage details.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use speaking_rate::features::envelope::Framing;
use speaking_rate::{run_batch, BatchConfig, BatchStatus, ConsoleFileSink, ReportFormat};

const USAGE: &str = "Usage: analyze_dir [options]\n\
\n\
  --input DIR        Directory with recordings (default: wav)\n\
  --output PATH      Report file (default: results.txt)\n\
  --ext EXT          File extension to pick up (default: wav)\n\
  --jobs N           Parallel workers (default: 1)\n\
  --timeout SECS     Give up on a single file after SECS seconds\n\
  --framing MODE     Envelope boundary frames: centered | valid (default: centered)\n\
  --strict-spacing   Round the minimum pulse distance up to whole frames\n\
  --no-energy        Omit the average energy column\n\
  --json             Emit one JSON object per line (JSONL) instead of a table\n";

fn next_value(args: &mut Vec<String>, flag: &str) -> Result<String, Box<dyn std::error::Error>> {
    if args.is_empty() {
        return Err(format!("{} requires a value", flag).into());
    }
    Ok(args.remove(0))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut config = BatchConfig::default();

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--input" => config.input_dir = PathBuf::from(next_value(&mut args, &a)?),
            "--output" => config.output_path = PathBuf::from(next_value(&mut args, &a)?),
            "--ext" => config.extension = next_value(&mut args, &a)?,
            "--jobs" => {
                let v = next_value(&mut args, &a)?.parse::<usize>()?;
                config.jobs = std::cmp::max(1, v);
            }
            "--timeout" => {
                let secs = next_value(&mut args, &a)?.parse::<f64>()?;
                config.file_timeout = Some(Duration::try_from_secs_f64(secs)?);
            }
            "--framing" => {
                let name = next_value(&mut args, &a)?;
                config.analysis.framing = Framing::from_name(&name)
                    .ok_or_else(|| format!("unknown framing '{}', expected centered or valid", name))?;
            }
            "--strict-spacing" => config.analysis.strict_peak_spacing = true,
            "--no-energy" => config.analysis.include_avg_energy = false,
            "--json" => config.format = ReportFormat::JsonLines,
            "--help" | "-h" => {
                eprintln!("{}", USAGE);
                return Ok(());
            }
            other => {
                eprintln!("ERROR: unknown argument '{}'. Use --help for usage.", other);
                std::process::exit(2);
            }
        }
    }

    let mut sink = ConsoleFileSink::stdout(config.output_path.clone(), config.format);
    let report = run_batch(&config, &mut sink)?;

    match report.status {
        BatchStatus::Completed => {
            if !report.failures.is_empty() {
                log::warn!(
                    "{} of {} files could not be analysed",
                    report.failures.len(),
                    report.files_found
                );
            }
        }
        BatchStatus::MissingInputDirectory | BatchStatus::NoFilesFound => {
            log::info!("Nothing to analyse.");
        }
        BatchStatus::NoResults => {
            log::info!("All {} files failed, no report written.", report.files_found);
        }
    }

    Ok(())
}
