//! strictbuild CLI binary entry point.
//! Resolves configuration, runs the scheduler, prints the report, and maps
//! the outcome to an exit code.

use anyhow::{Context as _, Result};
use clap::Parser;
use std::process::ExitCode;
use strictbuild::cli::Cli;
use strictbuild::config;
use strictbuild::output;
use strictbuild::scheduler::{BuildOutcome, Scheduler};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXIT_FAILED: u8 = 1;
const EXIT_WRONG_ARGS: u8 = 2;
const EXIT_NOTHING_TO_BUILD: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "strictbuild=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(EXIT_WRONG_ARGS)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let eff = config::resolve_effective(&cwd, cli.overrides())?;
    if !eff.config_found && cli.config.is_none() {
        tracing::debug!("no strictbuild.toml found; using defaults");
    }

    let scheduler = Scheduler::new(&eff.context).context("failed to build worker pool")?;
    let outcome = scheduler.run();
    output::print_outcome(&outcome, eff.output);

    Ok(match &outcome {
        BuildOutcome::NothingToBuild => ExitCode::from(EXIT_NOTHING_TO_BUILD),
        BuildOutcome::Finished(r) if r.passed => ExitCode::SUCCESS,
        BuildOutcome::Finished(_) => ExitCode::from(EXIT_FAILED),
    })
}
