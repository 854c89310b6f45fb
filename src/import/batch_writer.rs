//! Batched writes with per-record fallback.
//!
//! Records are written in fixed-size batches, strictly in input order. Each batch
//! starts in [`BatchMode::Bulk`]: one transactional insert that skips duplicate
//! keys. If that insert fails for any reason other than losing the store, the
//! batch switches to [`BatchMode::Fallback`] and its records are inserted one by
//! one, so a single malformed record only costs itself.

use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, warn};

use super::progress::{BatchProgress, ProgressReporter};
use super::stats::{FailedRecord, ImportKind, WriteTotals};
use crate::domain::entities::{InstitutionRecord, NewCollege, NewUniversity};
use crate::domain::repositories::{CollegeRepository, UniversityRepository};
use crate::error::AppError;

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Storage operations the writer needs for one record type.
#[async_trait]
pub trait RecordSink<T: Sync>: Send + Sync {
    /// Inserts a batch, skipping duplicate keys. Returns rows inserted.
    async fn insert_many(&self, batch: &[T]) -> Result<u64, AppError>;

    /// Inserts a single record. Duplicate keys surface as [`AppError::Conflict`].
    async fn insert_one(&self, record: &T) -> Result<(), AppError>;
}

#[async_trait]
impl<R: CollegeRepository + ?Sized> RecordSink<NewCollege> for R {
    async fn insert_many(&self, batch: &[NewCollege]) -> Result<u64, AppError> {
        CollegeRepository::insert_many(self, batch).await
    }

    async fn insert_one(&self, record: &NewCollege) -> Result<(), AppError> {
        CollegeRepository::insert(self, record).await
    }
}

#[async_trait]
impl<R: UniversityRepository + ?Sized> RecordSink<NewUniversity> for R {
    async fn insert_many(&self, batch: &[NewUniversity]) -> Result<u64, AppError> {
        UniversityRepository::insert_many(self, batch).await
    }

    async fn insert_one(&self, record: &NewUniversity) -> Result<(), AppError> {
        UniversityRepository::insert(self, record).await
    }
}

/// How a batch was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    Bulk,
    Fallback,
}

impl BatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bulk => "bulk",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DuplicateKey,
}

/// Result of writing one record in fallback mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    Skipped(SkipReason),
    Failed(String),
}

/// Result of writing one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// 0-based batch index.
    pub index: usize,
    pub size: usize,
    pub mode: BatchMode,
    pub inserted: u64,
    pub skipped_duplicates: u64,
    pub failures: Vec<FailedRecord>,
}

impl BatchReport {
    fn bulk(index: usize, size: usize, inserted: u64) -> Self {
        Self {
            index,
            size,
            mode: BatchMode::Bulk,
            inserted,
            skipped_duplicates: (size as u64).saturating_sub(inserted),
            failures: Vec::new(),
        }
    }

    fn fallback(index: usize, size: usize) -> Self {
        Self {
            index,
            size,
            mode: BatchMode::Fallback,
            inserted: 0,
            skipped_duplicates: 0,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, aishe_code: &str, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Inserted => self.inserted += 1,
            RecordOutcome::Skipped(SkipReason::DuplicateKey) => self.skipped_duplicates += 1,
            RecordOutcome::Failed(reason) => self.failures.push(FailedRecord {
                aishe_code: aishe_code.to_string(),
                reason,
            }),
        }
    }
}

impl WriteTotals {
    fn absorb(&mut self, report: BatchReport) {
        self.batches += 1;
        if report.mode == BatchMode::Fallback {
            self.fallback_batches += 1;
        }
        self.inserted += report.inserted;
        self.skipped_duplicates += report.skipped_duplicates;
        self.failures.extend(report.failures);
    }
}

/// Writes a record sequence through a [`RecordSink`].
pub struct BatchWriter<'a, S: ?Sized> {
    kind: ImportKind,
    sink: &'a S,
    reporter: &'a dyn ProgressReporter,
    batch_size: usize,
}

impl<'a, S: ?Sized> BatchWriter<'a, S> {
    /// Creates a writer. A `batch_size` of 0 is treated as 1.
    pub fn new(
        kind: ImportKind,
        sink: &'a S,
        reporter: &'a dyn ProgressReporter,
        batch_size: usize,
    ) -> Self {
        Self {
            kind,
            sink,
            reporter,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Writes every record, one batch at a time, reporting after each batch.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error ([`AppError::is_fatal`]). Batches committed
    /// before it stay committed; rerunning the import skips them.
    pub async fn write_all<T>(&self, records: &[T]) -> Result<WriteTotals, AppError>
    where
        S: RecordSink<T>,
        T: InstitutionRecord + Sync,
    {
        let started = Instant::now();
        let batches = records.len().div_ceil(self.batch_size);
        let mut totals = WriteTotals::default();

        for (index, batch) in records.chunks(self.batch_size).enumerate() {
            let report = self.write_batch(index, batch).await?;
            let mode = report.mode;
            totals.absorb(report);

            self.reporter.batch_completed(&BatchProgress {
                kind: self.kind,
                batch: index + 1,
                batches,
                mode,
                inserted: totals.inserted,
                target: records.len(),
                elapsed: started.elapsed(),
            });
        }

        Ok(totals)
    }

    /// Writes one batch, degrading to per-record inserts when the bulk insert fails.
    pub async fn write_batch<T>(&self, index: usize, batch: &[T]) -> Result<BatchReport, AppError>
    where
        S: RecordSink<T>,
        T: InstitutionRecord + Sync,
    {
        match self.sink.insert_many(batch).await {
            Ok(inserted) => Ok(BatchReport::bulk(index, batch.len(), inserted)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                error!(
                    entity = self.kind.as_str(),
                    batch = index + 1,
                    offset = index * self.batch_size,
                    error = %e,
                    details = %e.details(),
                    "Batch error, retrying records one by one"
                );
                self.write_fallback(index, batch).await
            }
        }
    }

    async fn write_fallback<T>(&self, index: usize, batch: &[T]) -> Result<BatchReport, AppError>
    where
        S: RecordSink<T>,
        T: InstitutionRecord + Sync,
    {
        let mut report = BatchReport::fallback(index, batch.len());

        for record in batch {
            let outcome = self.write_one(record).await?;
            report.record(record.aishe_code(), outcome);
        }

        Ok(report)
    }

    /// Inserts one record and classifies the result. Only fatal errors propagate.
    async fn write_one<T>(&self, record: &T) -> Result<RecordOutcome, AppError>
    where
        S: RecordSink<T>,
        T: InstitutionRecord + Sync,
    {
        match self.sink.insert_one(record).await {
            Ok(()) => Ok(RecordOutcome::Inserted),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) if e.is_conflict() => {
                warn!(
                    entity = self.kind.as_str(),
                    aishe_code = record.aishe_code(),
                    "Skip: already exists"
                );
                Ok(RecordOutcome::Skipped(SkipReason::DuplicateKey))
            }
            Err(e) => {
                warn!(
                    entity = self.kind.as_str(),
                    aishe_code = record.aishe_code(),
                    error = %e,
                    details = %e.details(),
                    "Skip: record rejected"
                );
                Ok(RecordOutcome::Failed(e.to_string()))
            }
        }
    }
}
