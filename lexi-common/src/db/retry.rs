//! Database lock retry
//!
//! SQLite serializes writers. When concurrent submissions collide, the
//! loser sees "database is locked"; these helpers retry such failures with
//! exponential backoff until a configured wall-clock budget runs out.

use sqlx::SqlitePool;
use std::time::{Duration, Instant};

use crate::{Error, Result};

/// Settings key holding the retry budget
pub const MAX_LOCK_WAIT_SETTING: &str = "db_max_lock_wait_ms";

/// Budget used when the setting is missing
pub const DEFAULT_MAX_LOCK_WAIT_MS: u64 = 5000;

/// Whether `err` is a transient SQLite busy/locked condition
pub fn is_lock_error(err: &Error) -> bool {
    match err {
        Error::Database(sqlx::Error::Database(db_err)) => {
            matches!(db_err.code().as_deref(), Some("5") | Some("6"))
                || db_err.message().contains("database is locked")
        }
        Error::Database(other) => other.to_string().contains("database is locked"),
        _ => false,
    }
}

/// Read the retry budget from the settings table
pub async fn max_lock_wait_ms(pool: &SqlitePool) -> Result<u64> {
    let value: Option<i64> = sqlx::query_scalar(
        "SELECT CAST(value AS INTEGER) FROM settings WHERE key = ?",
    )
    .bind(MAX_LOCK_WAIT_SETTING)
    .fetch_optional(pool)
    .await?;

    Ok(value
        .map(|v| v.max(0) as u64)
        .unwrap_or(DEFAULT_MAX_LOCK_WAIT_MS))
}

/// Retry a database operation with exponential backoff until `max_wait_ms` elapses.
///
/// Non-lock errors are returned immediately. Backoff starts at 10ms and
/// doubles up to 1000ms.
pub async fn retry_on_lock<F, Fut, T>(
    operation_name: &str,
    max_wait_ms: u64,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let start_time = Instant::now();
    let max_duration = Duration::from_millis(max_wait_ms);
    let mut attempt = 0u32;
    let mut backoff_ms = 10u64;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    let elapsed_ms = start_time.elapsed().as_millis();
                    if elapsed_ms > 2000 {
                        tracing::warn!(
                            operation = operation_name,
                            attempt,
                            elapsed_ms,
                            "Database operation succeeded after significant retry period (>2s)"
                        );
                    } else {
                        tracing::debug!(
                            operation = operation_name,
                            attempt,
                            elapsed_ms,
                            "Database operation succeeded after retry"
                        );
                    }
                }
                return Ok(result);
            }
            Err(err) => {
                if !is_lock_error(&err) {
                    return Err(err);
                }

                let elapsed = start_time.elapsed();
                if elapsed >= max_duration {
                    tracing::error!(
                        operation = operation_name,
                        attempt,
                        elapsed_ms = elapsed.as_millis(),
                        max_wait_ms,
                        "Database operation failed: max retry time exceeded"
                    );
                    return Err(Error::Internal(format!(
                        "Database locked after {} attempts ({} ms elapsed, max {} ms)",
                        attempt,
                        elapsed.as_millis(),
                        max_wait_ms
                    )));
                }

                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    backoff_ms,
                    "Database locked, will retry after backoff"
                );

                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = (backoff_ms * 2).min(1000);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_succeeds_first_attempt() {
        let result = retry_on_lock("test_op", 5000, || async { Ok::<i32, Error>(42) }).await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_non_lock_error_fails_immediately() {
        let attempts = AtomicU32::new(0);

        let result = retry_on_lock("test_op", 5000, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, Error>(Error::Internal("database is locked".to_string())) }
        })
        .await;

        // Only sqlx errors count as lock contention
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_is_lock_error_ignores_other_kinds() {
        assert!(!is_lock_error(&Error::NotFound("x".to_string())));
        assert!(!is_lock_error(&Error::Database(sqlx::Error::RowNotFound)));
        assert!(!is_lock_error(&Error::Database(sqlx::Error::PoolTimedOut)));
    }
}
