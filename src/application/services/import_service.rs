//! Import orchestration.
//!
//! A run goes through the stages of [`ImportPhase`] in order. Each stage is a
//! separate method so callers can stop between them (the CLI shows the plan and
//! asks for confirmation before writing); [`ImportService::import_colleges`] and
//! [`ImportService::import_universities`] run all of them back to back.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::entities::{InstitutionRecord, NewCollege, NewUniversity};
use crate::domain::repositories::{CollegeRepository, UniversityRepository};
use crate::error::AppError;
use crate::import::batch_writer::{BatchWriter, DEFAULT_BATCH_SIZE, RecordSink};
use crate::import::dedup::{Admission, DedupFilter};
use crate::import::normalizer::{normalize_college, normalize_university};
use crate::import::progress::ProgressReporter;
use crate::import::resolver::{Resolution, ResolutionIndex};
use crate::import::row::RawRow;
use crate::import::stats::{FilterStats, ImportKind, ImportPhase, ImportSummary};

/// Run-start snapshot of the store.
///
/// Built once in [`ImportPhase::Loading`] and only read afterwards. Records
/// written by other processes after it was taken are not seen; the store's
/// unique key still turns them into skipped duplicates at write time.
#[derive(Debug, Default)]
pub struct ImportContext {
    existing_codes: HashSet<String>,
    index: ResolutionIndex,
}

impl ImportContext {
    pub fn new(existing_codes: HashSet<String>, index: ResolutionIndex) -> Self {
        Self {
            existing_codes,
            index,
        }
    }

    pub fn existing_codes(&self) -> &HashSet<String> {
        &self.existing_codes
    }

    pub fn index(&self) -> &ResolutionIndex {
        &self.index
    }
}

/// New records selected for writing, with the counters from filtering.
#[derive(Debug, Clone)]
pub struct ImportPlan<T> {
    pub kind: ImportKind,
    pub records: Vec<T>,
    pub stats: FilterStats,
}

impl<T> ImportPlan<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Service reconciling spreadsheet datasets into the store.
///
/// Duplicate codes are always skipped, never overwritten.
pub struct ImportService<U: UniversityRepository, C: CollegeRepository> {
    universities: Arc<U>,
    colleges: Arc<C>,
    batch_size: usize,
}

impl<U: UniversityRepository, C: CollegeRepository> ImportService<U, C> {
    /// Creates a new import service writing [`DEFAULT_BATCH_SIZE`] records per batch.
    pub fn new(universities: Arc<U>, colleges: Arc<C>) -> Self {
        Self {
            universities,
            colleges,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the batch size. 0 is treated as 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Loads persisted college codes and the university resolution index.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn load_college_context(
        &self,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportContext, AppError> {
        reporter.phase_started(ImportKind::Colleges, ImportPhase::Loading);

        let existing_codes = self.colleges.existing_codes().await?;
        let index = ResolutionIndex::build(self.universities.list_refs().await?);

        info!(
            entity = ImportKind::Colleges.as_str(),
            existing = existing_codes.len(),
            universities = index.len(),
            "Snapshot loaded"
        );

        Ok(ImportContext::new(existing_codes, index))
    }

    /// Loads persisted university codes. Universities resolve nothing, so the
    /// index stays empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn load_university_context(
        &self,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportContext, AppError> {
        reporter.phase_started(ImportKind::Universities, ImportPhase::Loading);

        let existing_codes = self.universities.existing_codes().await?;

        info!(
            entity = ImportKind::Universities.as_str(),
            existing = existing_codes.len(),
            "Snapshot loaded"
        );

        Ok(ImportContext::new(existing_codes, ResolutionIndex::default()))
    }

    /// Normalizes, deduplicates and resolves college rows.
    pub fn plan_colleges(
        &self,
        context: &ImportContext,
        rows: &[RawRow],
        reporter: &dyn ProgressReporter,
    ) -> ImportPlan<NewCollege> {
        let kind = ImportKind::Colleges;
        reporter.phase_started(kind, ImportPhase::Filtering);

        let mut stats = FilterStats {
            total_rows: rows.len(),
            ..Default::default()
        };
        let mut dedup = DedupFilter::new(&context.existing_codes);
        let mut records = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let candidate = match normalize_college(row) {
                Ok(candidate) => candidate,
                Err(rejection) => {
                    stats.rejected += 1;
                    debug!(entity = kind.as_str(), row = index + 1, reason = %rejection, "Row rejected");
                    continue;
                }
            };

            if !admit(&mut dedup, &candidate, &mut stats) {
                continue;
            }

            let resolution = context.index.resolve(
                candidate.university_aishe_code.as_deref(),
                candidate.university_name.as_deref(),
            );
            match resolution {
                Resolution::ByCode(_) => stats.resolved_by_code += 1,
                Resolution::ByName(_) => stats.resolved_by_name += 1,
                Resolution::Unresolved => stats.unresolved += 1,
            }

            records.push(candidate.into_new_college(resolution.into_university_id()));
        }

        log_plan(kind, &stats);

        ImportPlan {
            kind,
            records,
            stats,
        }
    }

    /// Normalizes and deduplicates university rows.
    pub fn plan_universities(
        &self,
        context: &ImportContext,
        rows: &[RawRow],
        reporter: &dyn ProgressReporter,
    ) -> ImportPlan<NewUniversity> {
        let kind = ImportKind::Universities;
        reporter.phase_started(kind, ImportPhase::Filtering);

        let mut stats = FilterStats {
            total_rows: rows.len(),
            ..Default::default()
        };
        let mut dedup = DedupFilter::new(&context.existing_codes);
        let mut records = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            match normalize_university(row) {
                Ok(university) => {
                    if admit(&mut dedup, &university, &mut stats) {
                        records.push(university);
                    }
                }
                Err(rejection) => {
                    stats.rejected += 1;
                    debug!(entity = kind.as_str(), row = index + 1, reason = %rejection, "Row rejected");
                }
            }
        }

        log_plan(kind, &stats);

        ImportPlan {
            kind,
            records,
            stats,
        }
    }

    /// Writes a college plan.
    ///
    /// # Errors
    ///
    /// Returns the first fatal store error; batches written before it stay committed.
    pub async fn write_colleges(
        &self,
        plan: ImportPlan<NewCollege>,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, AppError> {
        self.write(self.colleges.as_ref(), plan, reporter).await
    }

    /// Writes a university plan.
    ///
    /// # Errors
    ///
    /// Returns the first fatal store error; batches written before it stay committed.
    pub async fn write_universities(
        &self,
        plan: ImportPlan<NewUniversity>,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, AppError> {
        self.write(self.universities.as_ref(), plan, reporter).await
    }

    /// Runs a full college import.
    pub async fn import_colleges(
        &self,
        rows: &[RawRow],
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, AppError> {
        let context = self.load_college_context(reporter).await?;
        let plan = self.plan_colleges(&context, rows, reporter);
        self.write_colleges(plan, reporter).await
    }

    /// Runs a full university import.
    pub async fn import_universities(
        &self,
        rows: &[RawRow],
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, AppError> {
        let context = self.load_university_context(reporter).await?;
        let plan = self.plan_universities(&context, rows, reporter);
        self.write_universities(plan, reporter).await
    }

    async fn write<T, S>(
        &self,
        sink: &S,
        plan: ImportPlan<T>,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, AppError>
    where
        S: RecordSink<T> + ?Sized,
        T: InstitutionRecord + Sync,
    {
        reporter.phase_started(plan.kind, ImportPhase::Writing);

        let started = Instant::now();
        let writer = BatchWriter::new(plan.kind, sink, reporter, self.batch_size);
        let totals = writer.write_all(&plan.records).await?;
        let summary = ImportSummary::new(plan.kind, plan.stats, totals, started.elapsed());

        reporter.phase_started(plan.kind, ImportPhase::Done);
        reporter.finished(&summary);

        Ok(summary)
    }
}

/// Runs the dedup filter for one normalized record, updating the counters.
fn admit<R: InstitutionRecord>(
    dedup: &mut DedupFilter<'_>,
    record: &R,
    stats: &mut FilterStats,
) -> bool {
    match dedup.admit(record.aishe_code()) {
        Admission::New => true,
        Admission::AlreadyPersisted => {
            stats.already_persisted += 1;
            false
        }
        Admission::RepeatedInInput => {
            stats.repeated_in_input += 1;
            debug!(aishe_code = record.aishe_code(), "Repeated code in input, keeping first");
            false
        }
    }
}

fn log_plan(kind: ImportKind, stats: &FilterStats) {
    info!(
        entity = kind.as_str(),
        total = stats.total_rows,
        new = stats.new_records(),
        rejected = stats.rejected,
        already_persisted = stats.already_persisted,
        repeated_in_input = stats.repeated_in_input,
        "Filtering complete"
    );
}
