//! Assessment and exercise session persistence

use lexi_common::{Error, Result};
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, timestamp};
use crate::models::{AssessmentRecord, ExerciseRecord, ExerciseSummary};

fn to_json<T: serde::Serialize>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Internal(format!("Failed to serialize {}: {}", what, e)))
}

fn from_json<T: serde::de::DeserializeOwned>(value: &str, what: &str) -> Result<T> {
    serde_json::from_str(value)
        .map_err(|e| Error::Internal(format!("Failed to deserialize {}: {}", what, e)))
}

/// Insert an assessment row on `conn`; the caller owns the transaction
pub async fn insert_assessment(conn: &mut SqliteConnection, record: &AssessmentRecord) -> Result<()> {
    let questions = to_json(&record.questions, "questions")?;

    sqlx::query(
        r#"
        INSERT INTO assessment_sessions (guid, user_id, questions, overall_accuracy, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.user_id)
    .bind(questions)
    .bind(record.overall_accuracy)
    .bind(timestamp(&record.created_at))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Insert an exercise row on `conn`; the caller owns the transaction
pub async fn insert_exercise(conn: &mut SqliteConnection, record: &ExerciseRecord) -> Result<()> {
    let words = to_json(&record.words, "words")?;
    let meta = to_json(&record.meta, "meta")?;

    sqlx::query(
        r#"
        INSERT INTO exercise_sessions (
            guid, user_id, exercise_type, level, expected_text,
            spoken_text, words, accuracy, meta, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.user_id)
    .bind(&record.exercise_type)
    .bind(record.level as i64)
    .bind(&record.expected_text)
    .bind(&record.spoken_text)
    .bind(words)
    .bind(record.accuracy)
    .bind(meta)
    .bind(timestamp(&record.created_at))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Most recent exercise sessions first
pub async fn recent_sessions(
    pool: &SqlitePool,
    user_id: &str,
    limit: u32,
) -> Result<Vec<ExerciseRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, user_id, exercise_type, level, expected_text,
               spoken_text, words, accuracy, meta, created_at
        FROM exercise_sessions
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let guid: String = row.get("guid");
            let id = Uuid::parse_str(&guid)
                .map_err(|e| Error::Internal(format!("Invalid session id {}: {}", guid, e)))?;
            let words: String = row.get("words");
            let meta: String = row.get("meta");
            let created_at: String = row.get("created_at");
            let level: i64 = row.get("level");

            Ok(ExerciseRecord {
                id,
                user_id: row.get("user_id"),
                exercise_type: row
                    .get::<Option<String>, _>("exercise_type")
                    .unwrap_or_default(),
                level: level.max(0) as u32,
                expected_text: row
                    .get::<Option<String>, _>("expected_text")
                    .unwrap_or_default(),
                spoken_text: row.get("spoken_text"),
                words: from_json(&words, "words")?,
                accuracy: row.get("accuracy"),
                meta: from_json(&meta, "meta")?,
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .collect()
}

/// Average accuracy and session count per exercise type
pub async fn accuracy_summary(pool: &SqlitePool, user_id: &str) -> Result<Vec<ExerciseSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT COALESCE(exercise_type, '') AS exercise_type,
               AVG(accuracy) AS avg_accuracy,
               COUNT(*) AS count
        FROM exercise_sessions
        WHERE user_id = ?
        GROUP BY COALESCE(exercise_type, '')
        ORDER BY exercise_type
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ExerciseSummary {
            exercise_type: row.get("exercise_type"),
            avg_accuracy: row.get("avg_accuracy"),
            count: row.get("count"),
        })
        .collect())
}

/// Number of stored assessments for a learner
pub async fn count_assessments(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM assessment_sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
