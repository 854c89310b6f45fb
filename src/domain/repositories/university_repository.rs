//! Repository trait for universities.

use crate::domain::entities::{NewUniversity, University, UniversityRef};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Repository interface for universities.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUniversityRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_university.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UniversityRepository: Send + Sync {
    /// Loads id, code and name of every university, for the resolution index.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn list_refs(&self) -> Result<Vec<UniversityRef>, AppError>;

    /// Loads every persisted university code.
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
    /// Returns [`AppError::Internal`] if any row violates a non-unique constraint;
    /// nothing from the batch is committed in that case.
    async fn insert_many(&self, batch: &[NewUniversity]) -> Result<u64, AppError>;

    /// Inserts one university.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code already exists.
    /// Returns [`AppError::Internal`] on constraint violations.
    async fn insert(&self, university: &NewUniversity) -> Result<(), AppError>;

    /// Finds a university by its AISHE code.
    async fn find_by_code(&self, aishe_code: &str) -> Result<Option<University>, AppError>;

    /// Counts all universities.
    async fn count(&self) -> Result<i64, AppError>;
}
