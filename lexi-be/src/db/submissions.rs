//! Atomic submission writes
//!
//! A stored session and the profile delta derived from it share one
//! transaction.

use lexi_common::db::{max_lock_wait_ms, retry_on_lock};
use lexi_common::{Error, PhonemeProfile, Result};
use sqlx::SqlitePool;

use super::{profiles, sessions};
use crate::models::{AssessmentRecord, ExerciseRecord};

/// Store an assessment and apply its delta; returns whether the profile changed
pub async fn record_assessment(
    pool: &SqlitePool,
    record: &AssessmentRecord,
    delta: &PhonemeProfile,
) -> Result<bool> {
    let max_wait_ms = max_lock_wait_ms(pool).await?;

    retry_on_lock("record_assessment", max_wait_ms, || async {
        let mut tx = pool.begin().await?;
        sessions::insert_assessment(&mut *tx, record).await?;
        let written = profiles::upsert_delta(&mut *tx, &record.user_id, delta).await?;
        tx.commit().await?;
        Ok::<_, Error>(written > 0)
    })
    .await
}

/// Store an exercise and apply its delta; returns whether the profile changed
pub async fn record_exercise(
    pool: &SqlitePool,
    record: &ExerciseRecord,
    delta: &PhonemeProfile,
) -> Result<bool> {
    let max_wait_ms = max_lock_wait_ms(pool).await?;

    retry_on_lock("record_exercise", max_wait_ms, || async {
        let mut tx = pool.begin().await?;
        sessions::insert_exercise(&mut *tx, record).await?;
        let written = profiles::upsert_delta(&mut *tx, &record.user_id, delta).await?;
        tx.commit().await?;
        Ok::<_, Error>(written > 0)
    })
    .await
}
