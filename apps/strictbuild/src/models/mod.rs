//! Shared data models for process outcomes and diagnostics.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A contiguous batch of job-definition files handled by one tool invocation.
pub struct JobGroup {
    /// Position of the group in the partition (0-based).
    pub index: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Diagnostic lines closed by a sentinel and attributed to one file.
pub struct FileSection {
    pub file: PathBuf,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
/// Result of one completed tool invocation.
pub struct ProcessOutcome {
    pub group: JobGroup,
    pub exit_code: Option<i32>,
    /// Raw diagnostic lines in arrival order.
    pub lines: Vec<String>,
    pub sections: Vec<FileSection>,
}

impl ProcessOutcome {
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
/// Structured decomposition of a diagnostic block.
pub struct DiagnosticDetail {
    pub kind: String,
    pub description: String,
    pub found: Option<String>,
    pub required: Option<String>,
    pub path: String,
    pub line: u32,
    pub pos: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
/// One blank-line delimited block of diagnostic output.
pub struct DiagnosticMessage {
    pub text: String,
    pub detail: Option<DiagnosticDetail>,
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Key of the per-path diagnostic index.
pub enum PathKey {
    File(String),
    Unknown,
}

impl PathKey {
    pub fn as_path(&self) -> Option<&str> {
        match self {
            PathKey::File(p) => Some(p.as_str()),
            PathKey::Unknown => None,
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::File(p) => f.write_str(p),
            PathKey::Unknown => f.write_str("<unknown>"),
        }
    }
}

impl Serialize for PathKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathKey::File(p) => serializer.serialize_str(p),
            PathKey::Unknown => serializer.serialize_none(),
        }
    }
}
