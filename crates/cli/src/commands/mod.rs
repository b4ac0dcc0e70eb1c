//! Command implementations.

pub mod auth;
pub mod fridge;
pub mod recipes;
pub mod scan;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CliError;

/// Parse a `YYYY-MM-DD` date as midnight UTC.
///
/// # Errors
///
/// Returns `CliError::InvalidDate` for anything else.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, CliError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CliError::InvalidDate(input.to_string()))
}
