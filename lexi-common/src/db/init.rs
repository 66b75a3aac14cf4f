//! Database initialization
//!
//! Opens (or creates) the SQLite database and ensures every LexiLift table
//! exists. Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use super::retry::MAX_LOCK_WAIT_SETTING;

/// SQLite-level wait before a locked write surfaces as an error.
///
/// Kept short; longer contention is handled by `retry_on_lock`.
pub const BUSY_TIMEOUT_MS: u64 = 250;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Per-connection options so every pooled connection gets the same pragmas.
    // WAL lets profile reads proceed while a submission is being written.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_settings_table(pool).await?;
    create_phoneme_stats_table(pool).await?;
    create_assessment_sessions_table(pool).await?;
    create_exercise_sessions_table(pool).await?;
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (1)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_phoneme_stats_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS phoneme_stats (
            user_id TEXT NOT NULL,
            phoneme TEXT NOT NULL,
            attempts INTEGER NOT NULL CHECK (attempts >= 1),
            errors INTEGER NOT NULL DEFAULT 0 CHECK (errors >= 0 AND errors <= attempts),
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, phoneme)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_assessment_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessment_sessions (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            questions TEXT NOT NULL,
            overall_accuracy REAL NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assessment_sessions_user ON assessment_sessions(user_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_exercise_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exercise_sessions (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            exercise_type TEXT,
            level INTEGER NOT NULL DEFAULT 1,
            expected_text TEXT,
            spoken_text TEXT,
            words TEXT NOT NULL DEFAULT '[]',
            accuracy REAL,
            meta TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_exercise_sessions_user ON exercise_sessions(user_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, MAX_LOCK_WAIT_SETTING, "5000").await?;
    Ok(())
}

/// Insert a setting only if it is not already present
pub async fn ensure_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(())
}
