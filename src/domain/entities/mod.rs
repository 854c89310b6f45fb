//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`University`] - A university, identified by its AISHE code
//! - [`College`] - A college, optionally affiliated to a university
//!
//! `NewUniversity` / `NewCollege` are insert payloads; ids and timestamps are
//! assigned by the database. [`UniversityRef`] is the projection used to build
//! the resolution index for an import run.

pub mod college;
pub mod university;

pub use college::{College, NewCollege};
pub use university::{NewUniversity, University, UniversityRef};

use std::ops::RangeInclusive;

/// Years accepted by the `*_year_check` constraints in `migrations/`.
pub const YEAR_OF_ESTABLISHMENT_RANGE: RangeInclusive<i32> = 1000..=9999;

/// A record keyed by its institution (AISHE) code.
///
/// The code is the stable external identifier and the unique key in storage.
pub trait InstitutionRecord {
    fn aishe_code(&self) -> &str;
}
