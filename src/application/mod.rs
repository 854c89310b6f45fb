//! Application layer services implementing business logic.
//!
//! Services consume repository traits and drive the [`crate::import`] engine,
//! so the same orchestration runs against PostgreSQL or test mocks.
//!
//! # Available Services
//!
//! - [`services::import_service::ImportService`] - University and college imports

pub mod services;
