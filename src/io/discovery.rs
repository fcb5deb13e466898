//! Input file discovery

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

/// List regular files directly inside `dir` with the given extension
///
/// The extension is compared case-insensitively and may be given with or
/// without the leading dot. Subdirectories are not traversed. Paths are
/// returned sorted so batch output is deterministic.
///
/// # Errors
///
/// Returns `AnalysisError::IoError` if the directory cannot be read
pub fn find_audio_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, AnalysisError> {
    let wanted = extension.trim_start_matches('.');

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type()?.is_file() && !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(wanted))
            .unwrap_or(false);

        if matches {
            files.push(path);
        }
    }

    files.sort();

    log::debug!(
        "Found {} *.{} file(s) in {}",
        files.len(),
        wanted,
        dir.display()
    );

    Ok(files)
}

/// Final path component as a display string
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
