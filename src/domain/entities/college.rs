//! College entity and its insert payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::InstitutionRecord;

/// A persisted college.
///
/// `university_id` is a weak reference: it is `None` when the parent could not be
/// resolved at import time or the university was deleted later. The
/// `university_*` text columns keep what the source dataset said either way.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct College {
    pub id: String,
    pub aishe_code: String,
    pub name: String,
    pub state: String,
    pub district: String,
    pub website: Option<String>,
    pub year_of_establishment: Option<i32>,
    pub location: Option<String>,
    pub college_type: Option<String>,
    pub management: Option<String>,
    pub university_aishe_code: Option<String>,
    pub university_name: Option<String>,
    pub university_type: Option<String>,
    pub university_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl College {
    pub fn is_linked(&self) -> bool {
        self.university_id.is_some()
    }
}

/// Input data for inserting a college.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCollege {
    pub aishe_code: String,
    pub name: String,
    pub state: String,
    pub district: String,
    pub website: Option<String>,
    pub year_of_establishment: Option<i32>,
    pub location: Option<String>,
    pub college_type: Option<String>,
    pub management: Option<String>,
    pub university_aishe_code: Option<String>,
    pub university_name: Option<String>,
    pub university_type: Option<String>,
    pub university_id: Option<String>,
}

impl InstitutionRecord for NewCollege {
    fn aishe_code(&self) -> &str {
        &self.aishe_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_college_link_state() {
        let now = Utc::now();
        let mut college = College {
            id: "c-1".to_string(),
            aishe_code: "C-10001".to_string(),
            name: "Hindu College".to_string(),
            state: "Delhi".to_string(),
            district: "North Delhi".to_string(),
            website: None,
            year_of_establishment: Some(1899),
            location: Some("Urban".to_string()),
            college_type: Some("Affiliated College".to_string()),
            management: Some("Private Aided".to_string()),
            university_aishe_code: Some("U-0001".to_string()),
            university_name: Some("University of Delhi".to_string()),
            university_type: Some("Central University".to_string()),
            university_id: None,
            created_at: now,
            updated_at: now,
        };

        assert!(!college.is_linked());

        college.university_id = Some("u-1".to_string());
        assert!(college.is_linked());
    }
}
