//! Segmentation of the tool's diagnostic stream.
//!
//! Two passes run over the same lines:
//! - `SectionSplitter` attributes sentinel-terminated sections to the group's
//!   files while lines are being read.
//! - `segment_blocks` splits the captured lines into blank-line delimited
//!   blocks, each parsed into a `DiagnosticMessage`.

use crate::models::{DiagnosticDetail, DiagnosticMessage, FileSection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Line prefix that closes the diagnostics of one job-definition file.
pub const SENTINEL: &str = "ATTENTION:";

static DETAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(\w+)\. ([^\n]*)\n(?:(found +:[^\n]*)\n(required:[^\n]*)\n)?at (.+?) line ([0-9]+) : ([0-9]+)",
    )
    .expect("diagnostic pattern compiles")
});

/// Incremental sentinel splitter fed one line at a time.
///
/// Lines buffer until a sentinel arrives; the buffer plus the sentinel then
/// become the section of the next unattributed file. A sentinel with no file
/// left is dropped, as is a trailing buffer that never closes.
pub struct SectionSplitter<'a> {
    files: &'a [PathBuf],
    cursor: usize,
    pending: Vec<String>,
    sections: Vec<FileSection>,
}

impl<'a> SectionSplitter<'a> {
    pub fn new(files: &'a [PathBuf]) -> Self {
        Self {
            files,
            cursor: 0,
            pending: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, line: &str) {
        self.pending.push(line.to_string());
        if !line.starts_with(SENTINEL) {
            return;
        }
        let lines = std::mem::take(&mut self.pending);
        match self.files.get(self.cursor) {
            Some(file) => {
                tracing::trace!(file = %file.display(), lines = lines.len(), "section closed");
                self.sections.push(FileSection {
                    file: file.clone(),
                    lines,
                });
                self.cursor += 1;
            }
            None => tracing::debug!("sentinel with no file left to attribute"),
        }
    }

    /// Completed sections; unterminated trailing lines are discarded.
    pub fn finish(self) -> Vec<FileSection> {
        if !self.pending.is_empty() {
            tracing::debug!(lines = self.pending.len(), "discarding unterminated section");
        }
        self.sections
    }
}

/// Attribute sentinel-terminated sections of `lines` to `files` in order.
pub fn split_sections(lines: &[String], files: &[PathBuf]) -> Vec<FileSection> {
    let mut splitter = SectionSplitter::new(files);
    for line in lines {
        splitter.push(line);
    }
    splitter.finish()
}

/// Split lines into maximal runs of non-blank lines, trimming each line.
pub fn segment_blocks(lines: &[String]) -> Vec<DiagnosticMessage> {
    let mut messages = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx].trim();
        if line.is_empty() {
            if !block.is_empty() {
                messages.push(parse_message(&block.join("\n")));
                block.clear();
            }
        } else {
            block.push(line);
        }
        idx += 1;
    }
    if !block.is_empty() {
        messages.push(parse_message(&block.join("\n")));
    }
    messages
}

/// Build a message from a joined block, attaching its detail when it matches.
pub fn parse_message(text: &str) -> DiagnosticMessage {
    DiagnosticMessage {
        text: text.to_string(),
        detail: parse_detail(text),
    }
}

/// Match a block against the diagnostic pattern.
///
/// The kind must start a line but may follow unrelated lines such as a
/// sentinel with no blank line in between. Returns a fully populated detail
/// or `None`; partial matches never produce a record.
///
/// # Panics
///
/// When a matched line or column does not fit in `u32`. The pattern only
/// admits ASCII digits, so this indicates malformed tool output.
pub fn parse_detail(text: &str) -> Option<DiagnosticDetail> {
    let caps = DETAIL_RE.captures(text)?;
    let number = |i: usize| -> u32 {
        caps[i]
            .parse()
            .unwrap_or_else(|e| panic!("numeric field {:?} in diagnostic: {}", &caps[i], e))
    };
    Some(DiagnosticDetail {
        kind: caps[1].to_string(),
        description: caps[2].to_string(),
        found: caps.get(3).map(|m| m.as_str().to_string()),
        required: caps.get(4).map(|m| m.as_str().to_string()),
        path: caps[5].to_string(),
        line: number(6),
        pos: number(7),
    })
}
