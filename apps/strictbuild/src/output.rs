//! Output rendering for build reports.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-group results, strict warnings grouped by path, and a summary.

use crate::config::OutputMode;
use crate::models::DiagnosticMessage;
use crate::scheduler::{BuildOutcome, BuildReport};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fmt::Write as _;

const SEPARATOR: &str = "────────────────────────────────────────";

fn use_colors(mode: OutputMode) -> bool {
    mode != OutputMode::Json && std::env::var_os("NO_COLOR").is_none()
}

/// Short machine-readable status of a run.
pub fn status(outcome: &BuildOutcome) -> &'static str {
    match outcome {
        BuildOutcome::NothingToBuild => "nothing-to-build",
        BuildOutcome::Finished(r) if r.passed => "passed",
        BuildOutcome::Finished(_) => "failed",
    }
}

/// Print the run result in the requested mode.
pub fn print_outcome(outcome: &BuildOutcome, mode: OutputMode) {
    match mode {
        OutputMode::Json => match serde_json::to_string_pretty(&compose_report_json(outcome)) {
            Ok(s) => println!("{}", s),
            Err(e) => tracing::error!(error = %e, "failed to serialize report"),
        },
        OutputMode::Human => print!("{}", render_human(outcome, use_colors(mode))),
    }
}

/// Render the human report as a string (pure) for testing purposes.
pub fn render_human(outcome: &BuildOutcome, color: bool) -> String {
    let mut out = String::new();
    let report = match outcome {
        BuildOutcome::NothingToBuild => {
            let msg = "Nothing to build: no job-definition files found.";
            if color {
                let _ = writeln!(out, "{}", msg.yellow().bold());
            } else {
                let _ = writeln!(out, "{}", msg);
            }
            return out;
        }
        BuildOutcome::Finished(r) => r,
    };

    for o in &report.outcomes {
        let files: Vec<String> = o
            .group
            .files
            .iter()
            .map(|f| f.to_string_lossy().to_string())
            .collect();
        let code = o
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let head = format!("group {} (exit {}): {}", o.group.index, code, files.join(", "));
        if !color {
            let _ = writeln!(out, "{}", head);
        } else if o.exited_cleanly() {
            let _ = writeln!(out, "{}", head.bright_black());
        } else {
            let _ = writeln!(out, "{}", head.red());
        }
    }
    for e in &report.failures {
        if color {
            let _ = writeln!(out, "{} {}", "✖ error:".red().bold(), e);
        } else {
            let _ = writeln!(out, "✖ error: {}", e);
        }
    }

    if let Some(strict) = &report.strict {
        for w in &strict.warnings {
            let _ = writeln!(out, "{}", SEPARATOR);
            if color {
                let _ = writeln!(out, "{} {}", "▲".yellow(), w.path.to_string().bold());
            } else {
                let _ = writeln!(out, "▲ {}", w.path);
            }
            let _ = writeln!(out, "{}", SEPARATOR);
            for m in &w.messages {
                let _ = writeln!(out, "{}\n", render_message(m));
            }
        }
    }

    let summary = summary_line(report);
    if !color {
        let _ = writeln!(out, "{}", summary);
    } else if report.is_clean() {
        let _ = writeln!(out, "{}", summary.green().bold());
    } else if report.passed {
        let _ = writeln!(out, "{}", summary.yellow().bold());
    } else {
        let _ = writeln!(out, "{}", summary.red().bold());
    }
    out
}

fn render_message(m: &DiagnosticMessage) -> String {
    let Some(d) = &m.detail else {
        return m.text.clone();
    };
    let mut s = format!("{}: {}", d.kind, d.description);
    if let Some(found) = &d.found {
        let _ = write!(s, "\n  {}", found);
    }
    if let Some(required) = &d.required {
        let _ = write!(s, "\n  {}", required);
    }
    let _ = write!(s, "\n  at {}:{}:{}", d.path, d.line, d.pos);
    s
}

fn summary_line(report: &BuildReport) -> String {
    let warnings: usize = report
        .strict
        .as_ref()
        .map(|s| s.warnings.iter().map(|w| w.messages.len()).sum())
        .unwrap_or(0);
    let verdict = if report.is_clean() {
        "Build succeeded"
    } else if report.passed {
        "Build passed with tool errors"
    } else {
        "Build failed"
    };
    format!(
        "— {} — groups={} failures={} strict_warnings={}",
        verdict,
        report.outcomes.len(),
        report.failures.len(),
        warnings
    )
}

/// Compose the JSON report (pure) for testing/snapshot purposes.
pub fn compose_report_json(outcome: &BuildOutcome) -> JsonVal {
    let report = match outcome {
        BuildOutcome::NothingToBuild => return json!({ "status": status(outcome) }),
        BuildOutcome::Finished(r) => r,
    };
    let groups: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| {
            json!({
                "index": o.group.index,
                "files": o.group.files,
                "exitCode": o.exit_code,
                "sections": o.sections.len(),
                "lines": o.lines.len(),
            })
        })
        .collect();
    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|e| json!({ "files": e.files(), "error": e.to_string() }))
        .collect();
    let warnings = report
        .strict
        .as_ref()
        .map(|s| serde_json::to_value(&s.warnings).unwrap_or(JsonVal::Null))
        .unwrap_or_else(|| json!([]));
    json!({
        "status": status(outcome),
        "groups": groups,
        "failures": failures,
        "warnings": warnings,
        "summary": {
            "strict": report.strict.is_some(),
            "passed": report.passed,
            "clean": report.is_clean(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobGroup, ProcessOutcome};
    use crate::scheduler::decide;
    use crate::strict::StrictPolicy;
    use std::path::PathBuf;

    fn finished(strict: &[&str], exit_code: i32) -> BuildOutcome {
        let outcome = ProcessOutcome {
            group: JobGroup {
                index: 0,
                files: vec![PathBuf::from("/c/a.json")],
            },
            exit_code: Some(exit_code),
            lines: [
                "JSC_X. bad thing",
                "found  : number",
                "required: string",
                "at /app/strict/a.js line 4 : 2",
                "",
                "loose remark",
            ]
            .iter()
            .map(|l| l.to_string())
            .collect(),
            sections: Vec::new(),
        };
        let policy = StrictPolicy::new(strict.iter().map(|s| s.to_string()).collect());
        BuildOutcome::Finished(decide(&policy, vec![outcome], Vec::new()))
    }

    #[test]
    fn test_json_nothing_to_build() {
        let out = compose_report_json(&BuildOutcome::NothingToBuild);
        assert_eq!(out["status"], "nothing-to-build");
    }

    #[test]
    fn test_json_strict_failure_shape() {
        let out = compose_report_json(&finished(&["/strict/"], 0));
        assert_eq!(out["status"], "failed");
        assert_eq!(out["groups"][0]["exitCode"], 0);
        assert_eq!(out["warnings"][0]["path"], "/app/strict/a.js");
        assert_eq!(out["warnings"][0]["messages"][0]["detail"]["line"], 4);
        assert_eq!(out["summary"]["clean"], false);
    }

    #[test]
    fn test_json_non_strict_passes() {
        let out = compose_report_json(&finished(&[], 0));
        assert_eq!(out["status"], "passed");
        assert_eq!(out["warnings"], json!([]));
        assert_eq!(out["summary"]["clean"], true);
    }

    #[test]
    fn test_human_groups_warnings_by_path() {
        let text = render_human(&finished(&["/strict/"], 0), false);
        assert!(text.contains("▲ /app/strict/a.js"));
        assert!(text.contains("JSC_X: bad thing\n  found  : number\n  required: string\n  at /app/strict/a.js:4:2"));
        assert!(!text.contains("loose remark"));
        assert!(text.contains("Build failed"));
    }

    #[test]
    fn test_human_banner_requires_clean_exit() {
        assert!(render_human(&finished(&[], 0), false).contains("Build succeeded"));
        let text = render_human(&finished(&[], 3), false);
        assert!(text.contains("Build passed with tool errors"));
        assert!(text.contains("group 0 (exit 3)"));
    }
}
