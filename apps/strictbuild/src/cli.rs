//! CLI argument parsing via `clap`.

use crate::config::Overrides;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "strictbuild",
    version,
    about = "Run a JS compiler over many job files in parallel",
    long_about = "strictbuild — splits the job-definition files of a directory into balanced groups, runs one compiler process per group in parallel, and fails the build when diagnostics land under a --strict path.\n\nConfiguration precedence: CLI > strictbuild.toml > defaults.",
    after_help = "Examples:\n  strictbuild --config-dir configs\n  strictbuild -j 4 --strict /src/app/ --strict /src/lib/\n  strictbuild --tool ./bin/plovr --output json"
)]
/// Top-level CLI options.
pub struct Cli {
    #[arg(long, help = "Compiler executable (default: plovr)")]
    pub tool: Option<String>,
    #[arg(long, help = "Directory holding job-definition files (default: .)")]
    pub config_dir: Option<String>,
    #[arg(short = 'j', long, help = "Number of parallel compiler processes (default: half the CPUs)")]
    pub parallelism: Option<usize>,
    #[arg(long = "strict", value_name = "PREFIX", help = "Fail on diagnostics whose path contains PREFIX (repeatable)")]
    pub strict: Vec<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, help = "Path to a strictbuild.toml|yaml file")]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            tool: self.tool.clone(),
            config_dir: self.config_dir.clone(),
            parallelism: self.parallelism,
            strict: self.strict.clone(),
            output: self.output.clone(),
        }
    }
}
