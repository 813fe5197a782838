//! Strict-mode policy: escalates diagnostics under configured paths.
//!
//! Diagnostics from every outcome are folded into a `PathDiagnosticIndex`
//! (per path, first-seen order, structural dedup). Entries whose path
//! contains any strict prefix become warnings that fail the build.

use crate::diagnostics::segment_blocks;
use crate::models::{DiagnosticMessage, PathKey, ProcessOutcome};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Substring filters selecting paths whose diagnostics break the build.
#[derive(Debug, Clone, Default)]
pub struct StrictPolicy {
    prefixes: Vec<String>,
}

impl StrictPolicy {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn is_strict(&self) -> bool {
        !self.prefixes.is_empty()
    }

    /// True when any prefix occurs anywhere in `path`.
    pub fn is_strict_path(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.contains(p.as_str()))
    }

    /// Fold outcomes and keep the entries under strict paths.
    pub fn evaluate(&self, outcomes: &[ProcessOutcome]) -> StrictReport {
        let index = PathDiagnosticIndex::from_outcomes(outcomes);
        let warnings: Vec<PathWarnings> = index
            .into_entries()
            .into_iter()
            .filter(|(key, _)| key.as_path().is_some_and(|p| self.is_strict_path(p)))
            .map(|(path, messages)| PathWarnings { path, messages })
            .collect();
        tracing::debug!(paths = warnings.len(), "strict warnings collected");
        StrictReport {
            no_warnings: warnings.is_empty(),
            warnings,
        }
    }
}

/// Ordered per-path sets of unique diagnostic messages.
#[derive(Debug, Default)]
pub struct PathDiagnosticIndex {
    entries: Vec<(PathKey, Vec<DiagnosticMessage>)>,
    slots: HashMap<PathKey, usize>,
    seen: HashSet<(usize, DiagnosticMessage)>,
}

impl PathDiagnosticIndex {
    pub fn insert(&mut self, message: DiagnosticMessage) {
        let key = match &message.detail {
            Some(d) => PathKey::File(d.path.clone()),
            None => PathKey::Unknown,
        };
        let slot = match self.slots.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.slots.insert(key.clone(), slot);
                self.entries.push((key, Vec::new()));
                slot
            }
        };
        if self.seen.insert((slot, message.clone())) {
            self.entries[slot].1.push(message);
        }
    }

    pub fn from_outcomes(outcomes: &[ProcessOutcome]) -> Self {
        let mut index = Self::default();
        for outcome in outcomes {
            for message in segment_blocks(&outcome.lines) {
                index.insert(message);
            }
        }
        index
    }

    pub fn get(&self, key: &PathKey) -> Option<&[DiagnosticMessage]> {
        self.slots.get(key).map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(PathKey, Vec<DiagnosticMessage>)> {
        self.entries
    }
}

#[derive(Debug, Clone, Serialize)]
/// Unique warnings reported for one strict path.
pub struct PathWarnings {
    pub path: PathKey,
    pub messages: Vec<DiagnosticMessage>,
}

#[derive(Debug, Clone, Serialize)]
/// Result of the strict policy over all outcomes.
pub struct StrictReport {
    pub warnings: Vec<PathWarnings>,
    pub no_warnings: bool,
}
