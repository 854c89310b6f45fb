//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UniversityRepository`] - University snapshot reads and inserts
//! - [`CollegeRepository`] - College snapshot reads and inserts
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod college_repository;
pub mod university_repository;

pub use college_repository::CollegeRepository;
pub use university_repository::UniversityRepository;

#[cfg(test)]
pub use college_repository::MockCollegeRepository;
#[cfg(test)]
pub use university_repository::MockUniversityRepository;
