//! Domain layer: entities and repository contracts.
//!
//! - [`entities`] - Universities, colleges and their insert payloads
//! - [`repositories`] - Storage traits implemented by the infrastructure layer
//!
//! The domain layer has no dependency on the persistence or CLI layers.

pub mod entities;
pub mod repositories;
