//! External tool invocation for one job group.

use crate::diagnostics::SectionSplitter;
use crate::error::RunError;
use crate::models::{JobGroup, ProcessOutcome};
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};

/// Sub-command passed to the tool before the job files.
pub const BUILD_COMMAND: &str = "build";

/// Kills and reaps the child unless it was already waited on.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        tracing::warn!(pid = self.child.id(), "killing tool process");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Build the tool command line for `group`.
pub fn build_command(tool: &str, group: &JobGroup) -> Command {
    let mut command = Command::new(tool);
    command.arg(BUILD_COMMAND).args(&group.files);
    command
}

/// Run the tool over `group`, blocking until it exits.
///
/// Standard output is discarded; stderr is read line by line and split
/// into per-file sections as it arrives. Any failure after spawning kills
/// the child before returning.
pub fn run_group(tool: &str, group: &JobGroup) -> Result<ProcessOutcome, RunError> {
    let mut command = build_command(tool, group);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    let child = command.spawn().map_err(|source| RunError::Spawn {
        tool: tool.to_string(),
        files: group.files.clone(),
        source,
    })?;
    let mut guard = ChildGuard {
        child,
        reaped: false,
    };
    tracing::debug!(
        group = group.index,
        pid = guard.child.id(),
        files = group.files.len(),
        "spawned tool"
    );

    let mut lines = Vec::new();
    let mut splitter = SectionSplitter::new(&group.files);
    if let Some(stderr) = guard.child.stderr.take() {
        let mut reader = BufReader::new(stderr);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| RunError::Read {
                    tool: tool.to_string(),
                    files: group.files.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            // Tool output is not guaranteed to be UTF-8
            let line = String::from_utf8_lossy(&buf)
                .trim_end_matches(['\n', '\r'])
                .to_string();
            splitter.push(&line);
            lines.push(line);
        }
    }

    let status = guard.wait().map_err(|source| RunError::Wait {
        tool: tool.to_string(),
        files: group.files.clone(),
        source,
    })?;
    tracing::info!(group = group.index, exit_code = ?status.code(), "tool finished");

    Ok(ProcessOutcome {
        group: group.clone(),
        exit_code: status.code(),
        lines,
        sections: splitter.finish(),
    })
}
