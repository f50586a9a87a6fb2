//! Directory date parsing and day-count helpers.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

const ONE_DAY_MS: i64 = 1000 * 60 * 60 * 24;

/// Date-time layouts seen in directory exports, tried in order.
///
/// Zone-less values are taken as UTC.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a date or date-time string from a directory export.
///
/// Accepts RFC 3339, ISO dates (`2023-10-01`), ISO date-times with or without
/// a `T`, and US-style `10/1/2023 9:15:00 AM` as written by PowerShell.
pub fn parse_directory_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        bail!("Empty date value");
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .context("Invalid midnight for date");
        }
    }

    bail!("Unrecognized date format: {}", value)
}

/// Whole days elapsed between `value` and `now`, rounded down.
///
/// Negative when the date lies in the future. Returns `sentinel` for empty or
/// unparseable input.
pub fn days_since(value: &str, now: DateTime<Utc>, sentinel: i64) -> i64 {
    match parse_directory_date(value) {
        Ok(dt) => now
            .signed_duration_since(dt)
            .num_milliseconds()
            .div_euclid(ONE_DAY_MS),
        Err(_) => {
            if !value.is_empty() {
                trace!(value, "Unparseable date, using sentinel");
            }
            sentinel
        }
    }
}

/// Report date stamp used in export file names.
pub fn date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}
