//! Repository trait for colleges.

use crate::domain::entities::{College, NewCollege};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Repository interface for colleges.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCollegeRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_college.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollegeRepository: Send + Sync {
    /// Loads every persisted college code, the dedup snapshot of an import run.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn existing_codes(&self) -> Result<HashSet<String>, AppError>;

    /// Inserts a batch in one transaction, skipping rows whose code already exists.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if any row violates a non-unique constraint
    /// (year range, dangling `university_id`); nothing from the batch is committed.
    /// Returns [`AppError::Unavailable`] if the connection is lost.
    async fn insert_many(&self, batch: &[NewCollege]) -> Result<u64, AppError>;

    /// Inserts one college.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code already exists.
    /// Returns [`AppError::Internal`] on constraint violations.
    async fn insert(&self, college: &NewCollege) -> Result<(), AppError>;

    /// Finds a college by its AISHE code.
    async fn find_by_code(&self, aishe_code: &str) -> Result<Option<College>, AppError>;

    /// Counts all colleges.
    async fn count(&self) -> Result<i64, AppError>;

    /// Counts colleges with no linked university.
    async fn count_unlinked(&self) -> Result<i64, AppError>;
}
