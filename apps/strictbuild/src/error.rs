//! Error types for configuration loading and process execution.
//!
//! Strict-mode violations are not errors: they surface as a failing
//! `BuildOutcome`. Only problems that prevent a group from being checked
//! end up here.

use std::path::PathBuf;
use thiserror::Error;

/// Problems detected before any process is launched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is not valid TOML: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("config file {path} is not valid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("parallelism must be at least 1")]
    ZeroParallelism,
    #[error("unknown output mode '{0}' (expected human|json)")]
    OutputMode(String),
}

/// Failure of one external tool invocation.
///
/// `Read` and `Wait` are only constructed after the child was killed and
/// reaped, so no process outlives the error.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        files: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read diagnostics from {tool}: {source}")]
    Read {
        tool: String,
        files: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for {tool}: {source}")]
    Wait {
        tool: String,
        files: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Job-definition files of the group that could not be checked.
    pub fn files(&self) -> &[PathBuf] {
        match self {
            RunError::Spawn { files, .. }
            | RunError::Read { files, .. }
            | RunError::Wait { files, .. } => files,
        }
    }
}
