//! Infrastructure layer for external integrations.
//!
//! - [`persistence`] - PostgreSQL pool, migrations and repository implementations

pub mod persistence;
