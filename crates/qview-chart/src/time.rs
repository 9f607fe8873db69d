use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// date-times without an offset are read as UTC
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

// date-times with an offset; a trailing `Z` is rewritten to `+00:00` first
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Parse an ISO-8601 date or date-time.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`, `2024-01-01T09:30:00+02:00`), minute-precision
/// date-times with an offset (`2024-01-01T09:30Z`), PostgreSQL's `timestamptz` text
/// (`2024-01-01 00:00:00+00`), offset-less date-times, bare dates and the reduced forms
/// `YYYY-MM` and `YYYY`. Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let zoned = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(rest) => format!("{rest}+00:00"),
        None => raw.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    calendar_date(raw)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM-DD`, `YYYY-MM` (first of the month) or `YYYY` (first of January).
fn calendar_date(raw: &str) -> Option<NaiveDate> {
    if !raw.is_ascii() {
        return None;
    }
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match raw.len() {
        4 if digits(raw) => NaiveDate::parse_from_str(&format!("{raw}-01-01"), "%Y-%m-%d").ok(),
        7 if digits(&raw[..4]) && raw.as_bytes()[4] == b'-' && digits(&raw[5..]) => {
            NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
        }
        _ => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
    }
}

/// Whole Unix seconds, truncated toward zero.
pub fn unix_seconds(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis() / 1000
}
