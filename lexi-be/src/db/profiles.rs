//! Phoneme profile store
//!
//! One row per (learner, phoneme). Deltas are applied as additive upserts
//! inside a transaction, so concurrent submissions for the same learner sum
//! exactly.

use chrono::Utc;
use lexi_common::db::{max_lock_wait_ms, retry_on_lock};
use lexi_common::{Error, PhonemeProfile, PhonemeStats, Result};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use super::timestamp;

/// Load a learner's profile; `None` if no row exists
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<PhonemeProfile>> {
    let rows = sqlx::query(
        "SELECT phoneme, attempts, errors FROM phoneme_stats WHERE user_id = ? ORDER BY phoneme",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(None);
    }

    let profile = rows
        .iter()
        .map(|row| {
            let attempts: i64 = row.get("attempts");
            let errors: i64 = row.get("errors");
            (
                row.get::<String, _>("phoneme"),
                PhonemeStats {
                    attempts: attempts.max(0) as u32,
                    errors: errors.max(0) as u32,
                },
            )
        })
        .collect();

    Ok(Some(profile))
}

/// Add `delta` to a learner's stored counters in its own transaction.
///
/// Returns whether anything was written. See [`upsert_delta`].
pub async fn apply_delta(pool: &SqlitePool, user_id: &str, delta: &PhonemeProfile) -> Result<bool> {
    if delta.is_empty() {
        return Ok(false);
    }

    let max_wait_ms = max_lock_wait_ms(pool).await?;

    retry_on_lock("apply_delta", max_wait_ms, || async {
        let mut tx = pool.begin().await?;
        let written = upsert_delta(&mut *tx, user_id, delta).await?;
        tx.commit().await?;
        Ok::<_, Error>(written > 0)
    })
    .await
}

/// Upsert every phoneme of `delta` on `conn`, returning the rows written.
///
/// A learner without a profile only gets one once a delta carries at least
/// one error; error-free deltas for such learners write nothing. The caller
/// owns the surrounding transaction.
pub async fn upsert_delta(
    conn: &mut SqliteConnection,
    user_id: &str,
    delta: &PhonemeProfile,
) -> Result<u64> {
    let has_errors = delta.total_errors() > 0;
    let updated_at = timestamp(&Utc::now());
    let mut written = 0u64;

    for (phoneme, stats) in delta.iter() {
        let result = sqlx::query(
            r#"
            INSERT INTO phoneme_stats (user_id, phoneme, attempts, errors, updated_at)
            SELECT ?1, ?2, ?3, ?4, ?5
            WHERE ?6 OR EXISTS (SELECT 1 FROM phoneme_stats WHERE user_id = ?1)
            ON CONFLICT(user_id, phoneme) DO UPDATE SET
                attempts = attempts + excluded.attempts,
                errors = errors + excluded.errors,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(phoneme)
        .bind(stats.attempts as i64)
        .bind(stats.errors as i64)
        .bind(&updated_at)
        .bind(has_errors)
        .execute(&mut *conn)
        .await?;

        written += result.rows_affected();
    }

    debug!(
        user_id,
        phonemes = delta.len(),
        errors = delta.total_errors(),
        written,
        "Profile delta applied"
    );

    Ok(written)
}

/// Remove every row of a learner's profile; returns the number of phonemes removed
pub async fn reset_profile(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let max_wait_ms = max_lock_wait_ms(pool).await?;

    retry_on_lock("reset_profile", max_wait_ms, || async {
        let result = sqlx::query("DELETE FROM phoneme_stats WHERE user_id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok::<_, Error>(result.rows_affected())
    })
    .await
}
