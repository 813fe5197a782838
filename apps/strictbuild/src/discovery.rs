//! Job-definition file discovery.

use std::fs;
use std::path::{Path, PathBuf};

/// Extension (without dot) of files handed to the external tool.
pub const JOB_EXTENSION: &str = "json";

/// List job-definition files directly inside `dir`, in enumeration order.
///
/// A missing or unreadable directory yields no files; the caller reports
/// that as "nothing to build". Paths are absolute when `dir` can be
/// canonicalized.
pub fn discover_job_files(dir: &Path) -> Vec<PathBuf> {
    let base = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let entries = match fs::read_dir(&base) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!(dir = %base.display(), error = %e, "config directory not readable");
            return Vec::new();
        }
    };
    let files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| is_job_file(path))
        .collect();
    tracing::debug!(dir = %base.display(), count = files.len(), "discovered job files");
    files
}

// Plain suffix match so a file named just `.json` still counts
fn is_job_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(JOB_EXTENSION))
        .is_some_and(|stem| stem.ends_with('.'))
}
