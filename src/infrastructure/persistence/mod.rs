//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgUniversityRepository`] - University snapshot reads and inserts
//! - [`PgCollegeRepository`] - College snapshot reads and inserts

pub mod pg_college_repository;
pub mod pg_university_repository;
pub mod pool;

pub use pg_college_repository::PgCollegeRepository;
pub use pg_university_repository::PgUniversityRepository;
