//! Run statistics accumulated by the import pipeline.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Which dataset an import run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Universities,
    Colleges,
}

impl ImportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Universities => "universities",
            Self::Colleges => "colleges",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run state. Runs move strictly forward: `Loading → Filtering → Writing → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPhase {
    /// Reading the dedup snapshot and the resolution index.
    Loading,
    /// Normalizing, resolving and deduplicating rows.
    Filtering,
    /// Batch loop.
    Writing,
    Done,
}

impl ImportPhase {
    #[cfg(test)]
    fn next(self) -> Option<Self> {
        match self {
            Self::Loading => Some(Self::Filtering),
            Self::Filtering => Some(Self::Writing),
            Self::Writing => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Filtering => "filtering",
            Self::Writing => "writing",
            Self::Done => "done",
        }
    }
}

/// Counters from the filtering phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total_rows: usize,
    /// Rows missing a required field.
    pub rejected: usize,
    /// Rows whose code was already in the store when the run started.
    pub already_persisted: usize,
    /// Rows repeating a code seen earlier in the same input.
    pub repeated_in_input: usize,
    pub resolved_by_code: usize,
    pub resolved_by_name: usize,
    pub unresolved: usize,
}

impl FilterStats {
    /// Rows that passed every filter.
    pub fn new_records(&self) -> usize {
        self.total_rows - self.rejected - self.already_persisted - self.repeated_in_input
    }

    pub fn skipped(&self) -> usize {
        self.total_rows - self.new_records()
    }
}

/// A record the writer gave up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecord {
    pub aishe_code: String,
    pub reason: String,
}

/// Counters from the writing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteTotals {
    pub batches: usize,
    pub fallback_batches: usize,
    pub inserted: u64,
    /// Records the store refused as duplicate keys (races past the snapshot).
    pub skipped_duplicates: u64,
    pub failures: Vec<FailedRecord>,
}

impl WriteTotals {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Final report of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub kind: ImportKind,
    pub filter: FilterStats,
    pub write: WriteTotals,
    pub elapsed_secs: f64,
}

impl ImportSummary {
    pub fn new(kind: ImportKind, filter: FilterStats, write: WriteTotals, elapsed: Duration) -> Self {
        Self {
            kind,
            filter,
            write,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    pub fn inserted(&self) -> u64 {
        self.write.inserted
    }

    /// Inserted records per second.
    pub fn rate(&self) -> f64 {
        rate(self.write.inserted, self.elapsed_secs)
    }
}

pub(crate) fn rate(count: u64, secs: f64) -> f64 {
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}
