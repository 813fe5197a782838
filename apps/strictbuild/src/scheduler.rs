//! Top-level scheduling: partition, fan out, fold.
//!
//! Each job group runs on a dedicated `rayon` pool sized to the context's
//! parallelism. Workers share only the read-only context; the strict fold
//! runs on the calling thread after every worker has joined.

use crate::config::Context;
use crate::error::RunError;
use crate::groups::partition;
use crate::models::{JobGroup, ProcessOutcome};
use crate::runner::run_group;
use crate::strict::{StrictPolicy, StrictReport};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Terminal state of a run.
#[derive(Debug)]
pub enum BuildOutcome {
    /// No job-definition files were found; neither a pass nor a failure.
    NothingToBuild,
    Finished(BuildReport),
}

/// Everything produced by a run with at least one group.
#[derive(Debug)]
pub struct BuildReport {
    /// Completed outcomes ordered by group index.
    pub outcomes: Vec<ProcessOutcome>,
    /// Groups whose invocation failed to run to completion.
    pub failures: Vec<RunError>,
    /// Absent when strict mode is off.
    pub strict: Option<StrictReport>,
    pub passed: bool,
}

impl BuildReport {
    pub fn all_exited_cleanly(&self) -> bool {
        self.failures.is_empty() && self.outcomes.iter().all(|o| o.exited_cleanly())
    }

    pub fn has_warnings(&self) -> bool {
        self.strict.as_ref().is_some_and(|s| !s.no_warnings)
    }

    /// Success banner condition: no strict warnings and every exit code zero.
    pub fn is_clean(&self) -> bool {
        !self.has_warnings() && self.all_exited_cleanly()
    }
}

/// Runs job groups with a bounded worker pool.
pub struct Scheduler<'a> {
    ctx: &'a Context,
    pool: ThreadPool,
    policy: StrictPolicy,
}

impl<'a> Scheduler<'a> {
    pub fn new(ctx: &'a Context) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(ctx.parallelism())
            .thread_name(|i| format!("strictbuild-worker-{i}"))
            .build()?;
        Ok(Self {
            ctx,
            pool,
            policy: StrictPolicy::new(ctx.strict_prefixes().to_vec()),
        })
    }

    pub fn groups(&self) -> Vec<JobGroup> {
        partition(self.ctx.job_files(), self.ctx.group_size())
    }

    pub fn run(&self) -> BuildOutcome {
        let groups = self.groups();
        if groups.is_empty() {
            tracing::info!(dir = %self.ctx.config_dir().display(), "nothing to build");
            return BuildOutcome::NothingToBuild;
        }
        tracing::info!(
            groups = groups.len(),
            group_size = self.ctx.group_size(),
            parallelism = self.ctx.parallelism(),
            "starting build"
        );

        let tool = self.ctx.tool();
        let results: Vec<Result<ProcessOutcome, RunError>> = self
            .pool
            .install(|| groups.par_iter().map(|g| run_group(tool, g)).collect());

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!(error = %e, "group failed");
                    failures.push(e);
                }
            }
        }
        BuildOutcome::Finished(decide(&self.policy, outcomes, failures))
    }
}

/// Fold outcomes into the pass/fail decision.
///
/// Without strict prefixes the policy is skipped and diagnostics never fail
/// the run. The one exception to that bypass is a `RunError`: a group that
/// could not be spawned, read, or awaited was never checked, so it fails the
/// run in strict and non-strict mode alike.
pub fn decide(
    policy: &StrictPolicy,
    mut outcomes: Vec<ProcessOutcome>,
    failures: Vec<RunError>,
) -> BuildReport {
    outcomes.sort_by_key(|o| o.group.index);
    let strict = policy.is_strict().then(|| policy.evaluate(&outcomes));
    let no_warnings = strict.as_ref().map_or(true, |s| s.no_warnings);
    let passed = no_warnings && failures.is_empty();
    tracing::info!(passed, outcomes = outcomes.len(), failures = failures.len(), "build decided");
    BuildReport {
        outcomes,
        failures,
        strict,
        passed,
    }
}
