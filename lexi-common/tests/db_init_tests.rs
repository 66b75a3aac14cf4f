//! Database initialization tests

use lexi_common::db::init::init_database;
use lexi_common::db::retry::{max_lock_wait_ms, DEFAULT_MAX_LOCK_WAIT_MS};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sub").join("lexilift.db");

    let pool = init_database(&db_path).await;

    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("lexilift.db");

    let first = init_database(&db_path).await.unwrap();
    first.close().await;

    let second = init_database(&db_path).await;
    assert!(second.is_ok(), "Failed to reopen database: {:?}", second.err());
}

#[tokio::test]
async fn test_tables_created() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("lexilift.db")).await.unwrap();

    for table in [
        "schema_version",
        "settings",
        "phoneme_stats",
        "assessment_sessions",
        "exercise_sessions",
    ] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_default_lock_wait_setting() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("lexilift.db")).await.unwrap();

    assert_eq!(max_lock_wait_ms(&pool).await.unwrap(), DEFAULT_MAX_LOCK_WAIT_MS);

    sqlx::query("UPDATE settings SET value = '1200' WHERE key = 'db_max_lock_wait_ms'")
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(max_lock_wait_ms(&pool).await.unwrap(), 1200);
}

#[tokio::test]
async fn test_phoneme_stats_rejects_more_errors_than_attempts() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("lexilift.db")).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO phoneme_stats (user_id, phoneme, attempts, errors, updated_at)
         VALUES ('u1', 'b', 1, 2, '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err());
}
