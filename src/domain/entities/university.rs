//! University entity and its insert payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::InstitutionRecord;

/// A persisted university.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct University {
    pub id: String,
    pub aishe_code: String,
    pub name: String,
    pub state: String,
    pub district: String,
    pub website: Option<String>,
    pub year_of_establishment: Option<i32>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a university needed to resolve a college's parent.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UniversityRef {
    pub id: String,
    pub aishe_code: String,
    pub name: String,
}

impl UniversityRef {
    pub fn new(id: impl Into<String>, aishe_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aishe_code: aishe_code.into(),
            name: name.into(),
        }
    }
}

/// Input data for inserting a university.
///
/// The row id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUniversity {
    pub aishe_code: String,
    pub name: String,
    pub state: String,
    pub district: String,
    pub website: Option<String>,
    pub year_of_establishment: Option<i32>,
    pub location: Option<String>,
}

impl InstitutionRecord for NewUniversity {
    fn aishe_code(&self) -> &str {
        &self.aishe_code
    }
}
