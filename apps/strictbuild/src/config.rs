//! Configuration loading and the immutable run `Context`.
//!
//! strictbuild reads `strictbuild.toml|yaml|yml` from the working directory
//! (or the file passed with `--config`) and merges it with CLI flags.
//! Defaults:
//! - `tool`: `plovr`
//! - `config_dir`: `.`
//! - `parallelism`: half of the available hardware threads, at least 1
//! - `strict`: empty (strict mode off)
//! - `output`: `human`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::discovery::discover_job_files;
use crate::error::ConfigError;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOOL: &str = "plovr";
pub const DEFAULT_CONFIG_DIR: &str = ".";
const CONFIG_NAMES: [&str; 3] = ["strictbuild.toml", "strictbuild.yaml", "strictbuild.yml"];

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
/// Root configuration loaded from `strictbuild.toml|yaml`.
pub struct FileConfig {
    pub tool: Option<String>,
    pub config_dir: Option<String>,
    pub parallelism: Option<usize>,
    #[serde(default)]
    pub strict: Option<Vec<String>>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Report rendering mode.
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            other => Err(ConfigError::OutputMode(other.to_string())),
        }
    }
}

#[derive(Debug, Default, Clone)]
/// Values supplied on the command line; `None` falls through to the file.
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub tool: Option<String>,
    pub config_dir: Option<String>,
    pub parallelism: Option<usize>,
    pub strict: Vec<String>,
    pub output: Option<String>,
}

/// Immutable configuration for one run.
///
/// The job-file list is computed on first access and cached for the
/// lifetime of the context. The cell has a single writer (the first
/// caller); later changes to the directory are not observed.
#[derive(Debug)]
pub struct Context {
    tool: String,
    config_dir: PathBuf,
    parallelism: usize,
    strict: Vec<String>,
    job_files: OnceCell<Vec<PathBuf>>,
}

impl Context {
    pub fn new(
        tool: impl Into<String>,
        config_dir: impl Into<PathBuf>,
        parallelism: usize,
        strict: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if parallelism == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        Ok(Self {
            tool: tool.into(),
            config_dir: config_dir.into(),
            parallelism,
            strict,
            job_files: OnceCell::new(),
        })
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn strict_prefixes(&self) -> &[String] {
        &self.strict
    }

    /// Job-definition files in the config directory (memoized).
    pub fn job_files(&self) -> &[PathBuf] {
        self.job_files
            .get_or_init(|| discover_job_files(&self.config_dir))
    }

    /// `ceil(file_count / parallelism)`; zero only when there are no files.
    pub fn group_size(&self) -> usize {
        self.job_files().len().div_ceil(self.parallelism)
    }
}

/// Half the available hardware threads, never below 1.
pub fn default_parallelism() -> usize {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (threads / 2).max(1)
}

/// Load `FileConfig` from an explicit path, dispatching on its extension.
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load the first `strictbuild.toml|yaml|yml` found in `root`, if any.
pub fn load_config(root: &Path) -> Result<Option<FileConfig>, ConfigError> {
    for name in CONFIG_NAMES {
        let p = root.join(name);
        if p.is_file() {
            return load_config_file(&p).map(Some);
        }
    }
    Ok(None)
}

/// Fully-resolved settings after applying precedence.
#[derive(Debug)]
pub struct Effective {
    pub context: Context,
    pub output: OutputMode,
    pub config_found: bool,
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// `cwd` is where the default config file is looked up.
pub fn resolve_effective(cwd: &Path, cli: Overrides) -> Result<Effective, ConfigError> {
    let cfg = match cli.config.as_deref() {
        Some(p) => Some(load_config_file(p)?),
        None => load_config(cwd)?,
    };
    let config_found = cfg.is_some();
    let cfg = cfg.unwrap_or_default();

    let tool = cli
        .tool
        .or(cfg.tool)
        .unwrap_or_else(|| DEFAULT_TOOL.to_string());
    let config_dir = cli
        .config_dir
        .or(cfg.config_dir)
        .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
    let parallelism = cli
        .parallelism
        .or(cfg.parallelism)
        .unwrap_or_else(default_parallelism);
    // Repeated --strict flags replace the file list rather than extending it
    let strict = if cli.strict.is_empty() {
        cfg.strict.unwrap_or_default()
    } else {
        cli.strict
    };
    let output = OutputMode::parse(cli.output.or(cfg.output).as_deref().unwrap_or("human"))?;

    Ok(Effective {
        context: Context::new(tool, config_dir, parallelism, strict)?,
        output,
        config_found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(dir.path(), Overrides::default()).unwrap();
        assert!(!eff.config_found);
        assert_eq!(eff.context.tool(), DEFAULT_TOOL);
        assert_eq!(eff.context.config_dir(), Path::new("."));
        assert!(eff.context.parallelism() > 0);
        assert!(eff.context.strict_prefixes().is_empty());
        assert_eq!(eff.output, OutputMode::Human);
    }

    #[test]
    fn test_load_toml_and_cli_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("strictbuild.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
tool = "/opt/plovr"
config_dir = "configs"
parallelism = 3
strict = ["/src/app/"]
output = "json"
            "#
        )
        .unwrap();

        let eff = resolve_effective(root, Overrides::default()).unwrap();
        assert!(eff.config_found);
        assert_eq!(eff.context.tool(), "/opt/plovr");
        assert_eq!(eff.context.parallelism(), 3);
        assert_eq!(eff.context.strict_prefixes(), ["/src/app/".to_string()]);
        assert_eq!(eff.output, OutputMode::Json);

        let cli = Overrides {
            parallelism: Some(5),
            strict: vec!["/lib/".into()],
            output: Some("human".into()),
            ..Overrides::default()
        };
        let eff = resolve_effective(root, cli).unwrap();
        assert_eq!(eff.context.parallelism(), 5);
        assert_eq!(eff.context.strict_prefixes(), ["/lib/".to_string()]);
        assert_eq!(eff.output, OutputMode::Human);
        assert_eq!(eff.context.config_dir(), Path::new("configs"));
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("strictbuild.yaml"),
            "tool: ./bin/plovr\nstrict:\n  - /strict/\n  - /strict2/\n",
        )
        .unwrap();
        let eff = resolve_effective(root, Overrides::default()).unwrap();
        assert_eq!(eff.context.tool(), "./bin/plovr");
        assert_eq!(eff.context.strict_prefixes().len(), 2);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("strictbuild.toml"), "parallelism = \"many\"").unwrap();
        let err = resolve_effective(dir.path(), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let dir = tempdir().unwrap();
        let cli = Overrides {
            parallelism: Some(0),
            ..Overrides::default()
        };
        let err = resolve_effective(dir.path(), cli).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroParallelism));
    }

    #[test]
    fn test_unknown_output_mode_rejected() {
        let dir = tempdir().unwrap();
        let cli = Overrides {
            output: Some("xml".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            resolve_effective(dir.path(), cli),
            Err(ConfigError::OutputMode(_))
        ));
    }

    #[test]
    fn test_job_files_memoized_and_group_size() {
        let dir = tempdir().unwrap();
        for name in ["a.json", "b.json", "c.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let ctx = Context::new("plovr", dir.path(), 2, Vec::new()).unwrap();
        assert_eq!(ctx.job_files().len(), 3);
        assert_eq!(ctx.group_size(), 2);
        // Later changes are not observed
        fs::write(dir.path().join("d.json"), "{}").unwrap();
        assert_eq!(ctx.job_files().len(), 3);
    }

    #[test]
    fn test_group_size_zero_without_files() {
        let dir = tempdir().unwrap();
        let ctx = Context::new("plovr", dir.path(), 4, Vec::new()).unwrap();
        assert_eq!(ctx.group_size(), 0);
    }
}
