//! Business logic services for the application layer.

pub mod import_service;

pub use import_service::{ImportContext, ImportPlan, ImportService};
