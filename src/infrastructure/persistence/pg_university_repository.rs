//! PostgreSQL implementation of the university repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{NewUniversity, University, UniversityRef};
use crate::domain::repositories::UniversityRepository;
use crate::error::AppError;

/// PostgreSQL repository for universities.
pub struct PgUniversityRepository {
    pool: Arc<PgPool>,
}

impl PgUniversityRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Column-major view of a batch, in `INSERT` column order.
#[derive(Default)]
struct UniversityColumns {
    aishe_code: Vec<String>,
    name: Vec<String>,
    state: Vec<String>,
    district: Vec<String>,
    website: Vec<Option<String>>,
    year_of_establishment: Vec<Option<i32>>,
    location: Vec<Option<String>>,
}

impl From<&[NewUniversity]> for UniversityColumns {
    fn from(batch: &[NewUniversity]) -> Self {
        let mut cols = UniversityColumns::default();
        for u in batch {
            cols.aishe_code.push(u.aishe_code.clone());
            cols.name.push(u.name.clone());
            cols.state.push(u.state.clone());
            cols.district.push(u.district.clone());
            cols.website.push(u.website.clone());
            cols.year_of_establishment.push(u.year_of_establishment);
            cols.location.push(u.location.clone());
        }
        cols
    }
}

#[async_trait]
impl UniversityRepository for PgUniversityRepository {
    async fn list_refs(&self) -> Result<Vec<UniversityRef>, AppError> {
        // ORDER BY keeps "last loaded wins" on duplicate names reproducible.
        let refs = sqlx::query_as::<_, UniversityRef>(
            "SELECT id, aishe_code, name FROM universities ORDER BY created_at, id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(refs)
    }

    async fn existing_codes(&self) -> Result<HashSet<String>, AppError> {
        let codes = sqlx::query_scalar::<_, String>("SELECT aishe_code FROM universities")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(codes.into_iter().collect())
    }

    async fn insert_many(&self, batch: &[NewUniversity]) -> Result<u64, AppError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let cols = UniversityColumns::from(batch);
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO universities (
                aishe_code, name, state, district, website, year_of_establishment, location
            )
            SELECT * FROM UNNEST(
                $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::int4[], $7::text[]
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
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, university: &NewUniversity) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO universities (
                aishe_code, name, state, district, website, year_of_establishment, location
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&university.aishe_code)
        .bind(&university.name)
        .bind(&university.state)
        .bind(&university.district)
        .bind(&university.website)
        .bind(university.year_of_establishment)
        .bind(&university.location)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_code(&self, aishe_code: &str) -> Result<Option<University>, AppError> {
        let university = sqlx::query_as::<_, University>(
            r#"
            SELECT id, aishe_code, name, state, district, website, year_of_establishment,
                   location, created_at, updated_at
            FROM universities
            WHERE aishe_code = $1
            "#,
        )
        .bind(aishe_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(university)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM universities")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_follow_batch_order() {
        let batch = vec![
            NewUniversity {
                aishe_code: "U-0001".to_string(),
                name: "University of Delhi".to_string(),
                state: "Delhi".to_string(),
                district: "North Delhi".to_string(),
                website: Some("www.du.ac.in".to_string()),
                year_of_establishment: Some(1922),
                location: None,
            },
            NewUniversity {
                aishe_code: "U-0002".to_string(),
                name: "Anna University".to_string(),
                state: "Tamil Nadu".to_string(),
                district: "Chennai".to_string(),
                website: None,
                year_of_establishment: None,
                location: Some("Urban".to_string()),
            },
        ];

        let cols = UniversityColumns::from(batch.as_slice());

        assert_eq!(cols.aishe_code, vec!["U-0001", "U-0002"]);
        assert_eq!(cols.website, vec![Some("www.du.ac.in".to_string()), None]);
        assert_eq!(cols.year_of_establishment, vec![Some(1922), None]);
        assert_eq!(cols.location, vec![None, Some("Urban".to_string())]);
    }
}
