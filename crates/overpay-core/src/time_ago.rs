//! "3 days ago" style labels for review timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::OverpayError;
use crate::OverpayResult;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%B %d, %Y", "%d %B %Y"];

/// Relative label for the distance between `past` and `now`.
///
/// Direction is ignored. Months are 30 days and years are 12 such months.
pub fn time_ago(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - past).num_seconds().unsigned_abs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    let (count, unit) = [
        (years, "year"),
        (months, "month"),
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
    ]
    .into_iter()
    .find(|(n, _)| *n > 0)
    .unwrap_or((seconds, "second"));

    let plural = if count > 1 { "s" } else { "" };
    format!("{count} {unit}{plural} ago")
}

/// Parse a review timestamp. Dates without a zone are taken as UTC midnight.
pub fn parse_review_date(text: &str) -> OverpayResult<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc());
            }
        }
    }

    Err(OverpayError::DateError(format!("Unrecognised date '{text}'")))
}

pub fn time_ago_str(text: &str, now: DateTime<Utc>) -> OverpayResult<String> {
    Ok(time_ago(parse_review_date(text)?, now))
}
