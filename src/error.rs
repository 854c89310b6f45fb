//! Error types shared by the persistence and import layers.

use serde_json::{Value, json};
use thiserror::Error;

/// Errors returned by repositories and services.
///
/// Only [`AppError::Unavailable`] is fatal to an import run. Everything else is
/// recovered locally by the batch writer (skip + count).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Unavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns `true` when the store can no longer be reached and the run must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns `true` for unique-key collisions.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn details(&self) -> &Value {
        match self {
            Self::Conflict { details, .. }
            | Self::Unavailable { details, .. }
            | Self::Internal { details, .. } => details,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Classifies a SQLx error into conflict, connectivity loss, or anything else.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        return AppError::internal(
            db.message().to_string(),
            json!({ "code": db.code(), "constraint": db.constraint() }),
        );
    }

    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            AppError::unavailable("Database unavailable", json!({ "reason": e.to_string() }))
        }
        other => AppError::internal("Database error", json!({ "reason": other.to_string() })),
    }
}
