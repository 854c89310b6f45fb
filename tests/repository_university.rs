mod common;

use college_registry::AppError;
use college_registry::domain::repositories::UniversityRepository;
use college_registry::infrastructure::persistence::PgUniversityRepository;
use common::{create_test_university, new_university};
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_insert_and_find_by_code(pool: PgPool) {
    let repo = PgUniversityRepository::new(Arc::new(pool));

    repo.insert(&new_university("U-0001", "University of Delhi"))
        .await
        .unwrap();

    let university = repo.find_by_code("U-0001").await.unwrap().unwrap();
    assert_eq!(university.name, "University of Delhi");
    assert_eq!(university.year_of_establishment, Some(1922));
    assert!(!university.id.is_empty());
}

#[sqlx::test]
async fn test_find_by_code_not_found(pool: PgPool) {
    let repo = PgUniversityRepository::new(Arc::new(pool));

    let result = repo.find_by_code("missing").await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
async fn test_insert_duplicate_is_conflict(pool: PgPool) {
    let repo = PgUniversityRepository::new(Arc::new(pool));
    repo.insert(&new_university("U-0001", "First")).await.unwrap();

    let result = repo.insert(&new_university("U-0001", "Second")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_insert_many_skips_existing_codes(pool: PgPool) {
    create_test_university(&pool, "U-0001", "Existing").await;
    let repo = PgUniversityRepository::new(Arc::new(pool));

    let inserted = repo
        .insert_many(&[
            new_university("U-0001", "Existing again"),
            new_university("U-0002", "Anna University"),
            new_university("U-0003", "University of Mumbai"),
        ])
        .await
        .unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(repo.count().await.unwrap(), 3);

    let kept = repo.find_by_code("U-0001").await.unwrap().unwrap();
    assert_eq!(kept.name, "Existing");
}

#[sqlx::test]
async fn test_insert_many_empty_batch(pool: PgPool) {
    let repo = PgUniversityRepository::new(Arc::new(pool));

    assert_eq!(repo.insert_many(&[]).await.unwrap(), 0);
}

#[sqlx::test]
async fn test_insert_many_rolls_back_on_invalid_record(pool: PgPool) {
    let repo = PgUniversityRepository::new(Arc::new(pool));
    let mut invalid = new_university("U-0002", "Broken");
    invalid.year_of_establishment = Some(20000);

    let result = repo
        .insert_many(&[new_university("U-0001", "Valid"), invalid])
        .await;

    assert!(matches!(result, Err(AppError::Internal { .. })));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[sqlx::test]
async fn test_existing_codes_and_refs(pool: PgPool) {
    let id = create_test_university(&pool, "U-0001", "University of Delhi").await;
    create_test_university(&pool, "U-0002", "Anna University").await;
    let repo = PgUniversityRepository::new(Arc::new(pool));

    let codes = repo.existing_codes().await.unwrap();
    assert_eq!(codes.len(), 2);
    assert!(codes.contains("U-0001"));

    let refs = repo.list_refs().await.unwrap();
    assert_eq!(refs.len(), 2);
    let delhi = refs.iter().find(|r| r.aishe_code == "U-0001").unwrap();
    assert_eq!(delhi.id, id);
    assert_eq!(delhi.name, "University of Delhi");
}
