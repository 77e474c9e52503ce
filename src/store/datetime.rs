//! SQLite datetime helpers
//!
//! Timestamps are stored as `datetime('now')` text (UTC, second precision)
//! and parsed back into chrono types.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Format a chrono timestamp the way SQLite's datetime('now') writes it.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse a SQLite datetime string to a chrono DateTime
pub(crate) fn parse_datetime(s: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(&format!("{} +0000", s), "%Y-%m-%d %H:%M:%S %z")
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid datetime value in database: {}", s))
}

pub(crate) fn parse_datetime_column(s: String, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_str(&format!("{} +0000", s), "%Y-%m-%d %H:%M:%S %z")
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

pub(crate) fn parse_optional_datetime_column(
    s: Option<String>,
    column: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match s {
        Some(raw) => parse_datetime_column(raw, column).map(Some),
        None => Ok(None),
    }
}
