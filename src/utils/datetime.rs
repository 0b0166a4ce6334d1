//! Date helpers for the digest schedule
//!
//! The digest always covers the next calendar day in the configured
//! timezone, so every date-dependent name (listing URL, artifact files,
//! header line) is derived from one place.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{AppError, AppResult};

/// Parse an IANA timezone name such as `Asia/Jakarta`
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| AppError::configuration(format!("Invalid timezone '{name}': {e}")))
}

/// The day after `now` in `tz`
pub fn target_date(tz: &Tz, now: DateTime<Utc>) -> NaiveDate {
    let today = now.with_timezone(tz).date_naive();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

/// `YYYY-MM-DD`, used in listing URLs and artifact file names
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Header form, e.g. `Friday, April 04 2025`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%A, %B %d %Y").to_string()
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_iso_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::configuration(format!("Invalid date '{value}': {e}")))
}

/// Kick-off `HH:MM` in `tz` for an epoch-milliseconds timestamp
pub fn kickoff_from_millis(millis: i64, tz: &Tz) -> Option<String> {
    let utc = Utc.timestamp_millis_opt(millis).single()?;
    Some(utc.with_timezone(tz).format("%H:%M").to_string())
}

/// Sort key for listing times; anything that is not `HH:MM` (`LIVE`, `TBA`)
/// sorts as 23:59
pub fn kickoff_sort_key(time: &str) -> NaiveTime {
    let fallback = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
    if !time.contains(':') {
        return fallback;
    }
    NaiveTime::parse_from_str(time.trim(), "%H:%M").unwrap_or(fallback)
}
