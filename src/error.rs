//! Error types for the speaking-rate analysis engine

use std::fmt;

/// Errors that can occur while loading or analysing a recording
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error (unsupported container, corrupt data, missing track)
    DecodingError(String),

    /// Filesystem error (unreadable input, unwritable output)
    IoError(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// Numerical error (NaN or infinite values in the signal)
    NumericalError(String),

    /// Per-file analysis exceeded its time budget
    Timeout(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::IoError(msg) => write!(f, "I/O error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            AnalysisError::Timeout(msg) => write!(f, "Timed out: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::IoError(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error;
        match err {
            Error::IoError(e) => AnalysisError::IoError(e.to_string()),
            other => AnalysisError::DecodingError(other.to_string()),
        }
    }
}
