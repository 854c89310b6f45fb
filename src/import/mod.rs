//! Bulk reconciliation engine.
//!
//! An import run turns a spreadsheet export into inserts:
//!
//! 1. [`source`] reads the dataset into [`row::RawRow`]s
//! 2. [`normalizer`] turns rows into typed candidates or rejects them
//! 3. [`resolver`] links college candidates to a parent university
//! 4. [`dedup`] drops codes already persisted or repeated in the input
//! 5. [`batch_writer`] writes the survivors in batches, falling back to
//!    per-record inserts for a batch whose bulk insert fails
//! 6. [`progress`] reports batch throughput and the final summary
//!
//! Orchestration lives in [`crate::application::services::ImportService`].

pub mod batch_writer;
pub mod dedup;
pub mod normalizer;
pub mod progress;
pub mod resolver;
pub mod row;
pub mod source;
pub mod stats;

pub use batch_writer::{BatchMode, BatchWriter, DEFAULT_BATCH_SIZE, RecordSink};
pub use progress::{BatchProgress, LogReporter, ProgressReporter};
pub use resolver::{Resolution, ResolutionIndex};
pub use row::{CellValue, RawRow};
pub use source::{Dataset, SourceError, read_dataset};
pub use stats::{FilterStats, ImportKind, ImportPhase, ImportSummary, WriteTotals};
