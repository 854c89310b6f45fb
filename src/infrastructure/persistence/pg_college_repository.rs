//! PostgreSQL implementation of the college repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{College, NewCollege};
use crate::domain::repositories::CollegeRepository;
use crate::error::AppError;

/// PostgreSQL repository for colleges.
///
/// Bulk inserts bind one array per column and expand them with `UNNEST`, so a
/// batch is a single statement regardless of its size.
pub struct PgCollegeRepository {
    pool: Arc<PgPool>,
}

impl PgCollegeRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Column-major view of a batch, in `INSERT` column order.
#[derive(Default)]
struct CollegeColumns {
    aishe_code: Vec<String>,
    name: Vec<String>,
    state: Vec<String>,
    district: Vec<String>,
    website: Vec<Option<String>>,
    year_of_establishment: Vec<Option<i32>>,
    location: Vec<Option<String>>,
    college_type: Vec<Option<String>>,
    management: Vec<Option<String>>,
    university_aishe_code: Vec<Option<String>>,
    university_name: Vec<Option<String>>,
    university_type: Vec<Option<String>>,
    university_id: Vec<Option<String>>,
}

impl From<&[NewCollege]> for CollegeColumns {
    fn from(batch: &[NewCollege]) -> Self {
        let mut cols = CollegeColumns::default();
        for c in batch {
            cols.aishe_code.push(c.aishe_code.clone());
            cols.name.push(c.name.clone());
            cols.state.push(c.state.clone());
            cols.district.push(c.district.clone());
            cols.website.push(c.website.clone());
            cols.year_of_establishment.push(c.year_of_establishment);
            cols.location.push(c.location.clone());
            cols.college_type.push(c.college_type.clone());
            cols.management.push(c.management.clone());
            cols.university_aishe_code.push(c.university_aishe_code.clone());
            cols.university_name.push(c.university_name.clone());
            cols.university_type.push(c.university_type.clone());
            cols.university_id.push(c.university_id.clone());
        }
        cols
    }
}

#[async_trait]
impl CollegeRepository for PgCollegeRepository {
    async fn existing_codes(&self) -> Result<HashSet<String>, AppError> {
        let codes = sqlx::query_scalar::<_, String>("SELECT aishe_code FROM colleges")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(codes.into_iter().collect())
    }

    async fn insert_many(&self, batch: &[NewCollege]) -> Result<u64, AppError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let cols = CollegeColumns::from(batch);
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO colleges (
                aishe_code, name, state, district, website, year_of_establishment,
                location, college_type, management, university_aishe_code,
                university_name, university_type, university_id
            )
            SELECT * FROM UNNEST(
                $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::int4[],
                $7::text[], $8::text[], $9::text[], $10::text[],
                $11::text[], $12::text[], $13::text[]
            )
            ON CONFLICT (aishe_code) DO NOTHING
            "#,
        )
        .bind(cols.aishe_code)
        .bind(cols.name)
        .bind(cols.state)
        .bind(cols.district)
        .bind(cols.website)
        .bind(cols.year_of_establishment)
        .bind(cols.location)
        .bind(cols.college_type)
        .bind(cols.management)
        .bind(cols.university_aishe_code)
        .bind(cols.university_name)
        .bind(cols.university_type)
        .bind(cols.university_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, college: &NewCollege) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO colleges (
                aishe_code, name, state, district, website, year_of_establishment,
                location, college_type, management, university_aishe_code,
                university_name, university_type, university_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&college.aishe_code)
        .bind(&college.name)
        .bind(&college.state)
        .bind(&college.district)
        .bind(&college.website)
        .bind(college.year_of_establishment)
        .bind(&college.location)
        .bind(&college.college_type)
        .bind(&college.management)
        .bind(&college.university_aishe_code)
        .bind(&college.university_name)
        .bind(&college.university_type)
        .bind(&college.university_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_code(&self, aishe_code: &str) -> Result<Option<College>, AppError> {
        let college = sqlx::query_as::<_, College>(
            r#"
            SELECT id, aishe_code, name, state, district, website, year_of_establishment,
                   location, college_type, management, university_aishe_code,
                   university_name, university_type, university_id, created_at, updated_at
            FROM colleges
            WHERE aishe_code = $1
            "#,
        )
        .bind(aishe_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(college)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM colleges")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_unlinked(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM colleges WHERE university_id IS NULL",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
