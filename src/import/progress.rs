//! Progress reporting for import runs.
//!
//! Reporting never affects the outcome of a run. [`LogReporter`] writes
//! structured `tracing` events and bumps `metrics` counters; no metrics exporter
//! is installed by this crate, so counters are no-ops unless the embedding
//! binary installs a recorder.

use std::time::Duration;

use metrics::counter;
use tracing::info;

use super::batch_writer::BatchMode;
use super::stats::{ImportKind, ImportPhase, ImportSummary, rate};

/// Snapshot taken after each batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub kind: ImportKind,
    /// 1-based batch number.
    pub batch: usize,
    pub batches: usize,
    pub mode: BatchMode,
    /// Running total of inserted records.
    pub inserted: u64,
    /// Number of new records the run is writing.
    pub target: usize,
    pub elapsed: Duration,
}

impl BatchProgress {
    /// Inserted records per second so far.
    pub fn rate(&self) -> f64 {
        rate(self.inserted, self.elapsed.as_secs_f64())
    }
}

/// Sink for progress events.
pub trait ProgressReporter: Send + Sync {
    fn phase_started(&self, kind: ImportKind, phase: ImportPhase);

    fn batch_completed(&self, progress: &BatchProgress);

    fn finished(&self, summary: &ImportSummary);
}

/// Reports through `tracing` and `metrics`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn phase_started(&self, kind: ImportKind, phase: ImportPhase) {
        info!(entity = kind.as_str(), phase = phase.as_str(), "Import phase");
    }

    fn batch_completed(&self, progress: &BatchProgress) {
        counter!(
            "import_batches_total",
            "entity" => progress.kind.as_str(),
            "mode" => progress.mode.as_str()
        )
        .increment(1);

        info!(
            entity = progress.kind.as_str(),
            batch = progress.batch,
            batches = progress.batches,
            mode = progress.mode.as_str(),
            inserted = progress.inserted,
            target = progress.target,
            elapsed_secs = format_args!("{:.1}", progress.elapsed.as_secs_f64()),
            rate = format_args!("{:.0}", progress.rate()),
            "Progress: {}/{} ({:.0} records/sec)",
            progress.inserted,
            progress.target,
            progress.rate()
        );
    }

    fn finished(&self, summary: &ImportSummary) {
        let entity = summary.kind.as_str();
        counter!("import_rows_total", "entity" => entity)
            .increment(summary.filter.total_rows as u64);
        counter!("import_records_inserted_total", "entity" => entity)
            .increment(summary.write.inserted);
        counter!("import_records_failed_total", "entity" => entity)
            .increment(summary.write.failed() as u64);
        counter!("import_fallback_batches_total", "entity" => entity)
            .increment(summary.write.fallback_batches as u64);

        info!(
            entity,
            inserted = summary.write.inserted,
            skipped_duplicates = summary.write.skipped_duplicates,
            failed = summary.write.failed(),
            elapsed_secs = format_args!("{:.1}", summary.elapsed_secs),
            rate = format_args!("{:.0}", summary.rate()),
            "Import complete"
        );
    }
}
