use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

/// Fixed-width RFC 3339 so that `ORDER BY created_at` sorts chronologically.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Lists are stored as JSON text; NULL reads back as an empty list.
pub fn encode_list(values: &[String]) -> Result<Option<String>> {
    if values.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(values)
        .map(Some)
        .context("failed to encode list column")
}

pub fn decode_list(value: Option<String>, field: &str) -> Result<Vec<String>> {
    match value {
        Some(raw) => serde_json::from_str(&raw).with_context(|| format!("failed to parse {field}")),
        None => Ok(Vec::new()),
    }
}
