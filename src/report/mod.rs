//! Report rendering and persistence
//!
//! The batch driver hands finished [`AnalysisRecord`]s to a [`ReportSink`]. The
//! default [`ConsoleFileSink`] prints the report between separator rules and
//! writes the same text to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analysis::result::AnalysisRecord;
use crate::error::AnalysisError;

/// Column headers, in output order
pub const COLUMNS: [&str; 4] = [
    "File Name",
    "Duration (sec)",
    "Speaking Rate (syllables/sec)",
    "Avg Energy (Non-Silent)",
];

/// Width of the console separator rules
const RULE_WIDTH: usize = 80;

/// Report rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Right-aligned text table with a header row
    #[default]
    Table,
    /// One JSON object per record per line (JSONL)
    JsonLines,
}

/// Receives the finished records of a batch
pub trait ReportSink {
    /// Consume the records of one run
    ///
    /// Only called with a non-empty slice.
    fn write(&mut self, records: &[AnalysisRecord]) -> Result<(), AnalysisError>;
}

/// Render records as an aligned text table
///
/// The energy column appears only if at least one record carries a value.
///
/// # Example
///
/// ```
/// use speaking_rate::AnalysisRecord;
/// use speaking_rate::report::render_table;
///
/// let records = vec![AnalysisRecord {
///     file_name: "a.wav".to_string(),
///     duration_seconds: 2.0,
///     speaking_rate: 1.5,
///     avg_energy: None,
/// }];
/// let table = render_table(&records);
/// assert!(table.lines().next().unwrap().contains("Duration (sec)"));
/// assert!(table.contains("2.00"));
/// ```
pub fn render_table(records: &[AnalysisRecord]) -> String {
    let with_energy = records.iter().any(|r| r.avg_energy.is_some());
    let num_columns = if with_energy { 4 } else { 3 };

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
    rows.push(COLUMNS[..num_columns].iter().map(|c| c.to_string()).collect());

    for record in records {
        let mut row = vec![
            record.file_name.clone(),
            format!("{:.2}", record.duration_seconds),
            format!("{:.2}", record.speaking_rate),
        ];
        if with_energy {
            row.push(format!("{:.4}", record.avg_energy.unwrap_or(0.0)));
        }
        rows.push(row);
    }

    let widths: Vec<usize> = (0..num_columns)
        .map(|col| rows.iter().map(|row| row[col].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:>width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render records as JSON lines
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if a record cannot be serialized
pub fn render_json_lines(records: &[AnalysisRecord]) -> Result<String, AnalysisError> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| AnalysisError::ProcessingError(format!("JSON serialization failed: {e}")))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Render records in the requested format
pub fn render(records: &[AnalysisRecord], format: ReportFormat) -> Result<String, AnalysisError> {
    match format {
        ReportFormat::Table => Ok(render_table(records)),
        ReportFormat::JsonLines => render_json_lines(records),
    }
}

/// Prints the report to a console stream and saves it to a file
#[derive(Debug)]
pub struct ConsoleFileSink<W: Write> {
    console: W,
    output_path: PathBuf,
    format: ReportFormat,
}

impl ConsoleFileSink<std::io::Stdout> {
    /// Sink printing to standard output
    pub fn stdout(output_path: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self::new(std::io::stdout(), output_path, format)
    }
}

impl<W: Write> ConsoleFileSink<W> {
    /// Sink printing to an arbitrary writer
    pub fn new(console: W, output_path: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            console,
            output_path: output_path.into(),
            format,
        }
    }

    /// Where the report is persisted
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Give back the console writer
    pub fn into_console(self) -> W {
        self.console
    }
}

impl<W: Write> ReportSink for ConsoleFileSink<W> {
    fn write(&mut self, records: &[AnalysisRecord]) -> Result<(), AnalysisError> {
        let text = render(records, self.format)?;
        let rule = "=".repeat(RULE_WIDTH);

        // Console output is not retracted if saving fails below, and a console
        // failure still lets the file be saved
        let console_result = write!(self.console, "\n{}\n{}{}\n\n", rule, text, rule)
            .and_then(|_| self.console.flush());
        if let Err(e) = &console_result {
            log::error!("Failed to print results: {}", e);
        }

        fs::write(&self.output_path, &text).map_err(|e| {
            AnalysisError::IoError(format!(
                "Failed to save results to '{}': {}",
                self.output_path.display(),
                e
            ))
        })?;

        log::info!("Results successfully saved to '{}'", self.output_path.display());
        console_result.map_err(AnalysisError::from)
    }
}
