//! Database operations for lexi-be

pub mod profiles;
pub mod sessions;
pub mod submissions;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 so stored timestamps sort lexically
pub(crate) fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> lexi_common::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| lexi_common::Error::Internal(format!("Failed to parse timestamp: {}", e)))
}
