#![allow(dead_code)]

use college_registry::application::services::ImportService;
use college_registry::domain::entities::{NewCollege, NewUniversity};
use college_registry::import::RawRow;
use college_registry::import::row::columns;
use college_registry::infrastructure::persistence::{PgCollegeRepository, PgUniversityRepository};
use sqlx::PgPool;
use std::sync::Arc;

pub type PgImportService = ImportService<PgUniversityRepository, PgCollegeRepository>;

pub async fn create_test_university(pool: &PgPool, code: &str, name: &str) -> String {
    sqlx::query_scalar(
        "INSERT INTO universities (aishe_code, name, state, district) VALUES ($1, $2, 'Delhi', 'New Delhi') RETURNING id",
    )
    .bind(code)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_college(pool: &PgPool, code: &str) {
    sqlx::query(
        "INSERT INTO colleges (aishe_code, name, state, district) VALUES ($1, 'Existing College', 'Kerala', 'Ernakulam')",
    )
    .bind(code)
    .execute(pool)
    .await
    .unwrap();
}

pub fn new_university(code: &str, name: &str) -> NewUniversity {
    NewUniversity {
        aishe_code: code.to_string(),
        name: name.to_string(),
        state: "Delhi".to_string(),
        district: "New Delhi".to_string(),
        website: None,
        year_of_establishment: Some(1922),
        location: None,
    }
}

pub fn new_college(code: &str, university_id: Option<&str>) -> NewCollege {
    NewCollege {
        aishe_code: code.to_string(),
        name: format!("College {}", code),
        state: "Kerala".to_string(),
        district: "Ernakulam".to_string(),
        website: Some("https://example.edu".to_string()),
        year_of_establishment: Some(1995),
        location: Some("Urban".to_string()),
        college_type: Some("Affiliated College".to_string()),
        management: Some("Private Un-Aided".to_string()),
        university_aishe_code: None,
        university_name: None,
        university_type: None,
        university_id: university_id.map(str::to_string),
    }
}

pub fn college_row(code: &str, university_code: Option<&str>, university_name: Option<&str>) -> RawRow {
    let mut row: RawRow = [
        (columns::AISHE_CODE, code),
        (columns::NAME, "Acme College"),
        (columns::STATE, "Kerala"),
        (columns::DISTRICT, "Ernakulam"),
        (columns::COLLEGE_TYPE, "Affiliated College"),
    ]
    .into_iter()
    .collect();
    if let Some(code) = university_code {
        row.insert(columns::UNIVERSITY_AISHE_CODE, code);
    }
    if let Some(name) = university_name {
        row.insert(columns::UNIVERSITY_NAME, name);
    }
    row
}

pub fn university_row(code: &str, name: &str) -> RawRow {
    [
        (columns::AISHE_CODE, code),
        (columns::NAME, name),
        (columns::STATE, "Delhi"),
        (columns::DISTRICT, "New Delhi"),
    ]
    .into_iter()
    .collect()
}

pub fn create_import_service(pool: PgPool, batch_size: usize) -> PgImportService {
    let pool = Arc::new(pool);
    ImportService::new(
        Arc::new(PgUniversityRepository::new(pool.clone())),
        Arc::new(PgCollegeRepository::new(pool)),
    )
    .with_batch_size(batch_size)
}
