use crate::time::{parse_date, unix_seconds};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::trace;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Input records
//
////////////////////////////////////////////////////////////////////////////////////////////////////

// [
//      {
//          "date": "2024-01-01",       # ISO-8601, date or date-time
//          "open": "10",               # number, numeric string, null or missing
//          "high": 12.0,
//          "low": 9,
//          "close": "11",
//          "trend_q": -0.4,
//          "fq": null,
//          "qv1": "1.2e3"
//      },
//      ...
// ]

/// A dated observation for a stock or index: OHLC prices plus the Q-index indicators.
///
/// Nothing here is validated on the way in. The `date` and every numeric field may be
/// missing or malformed; the formatters decide what that means (a `null` time or a zero).
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TimeSeriesPoint {
    #[serde(
        default,
        deserialize_with = "de_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_q: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fq: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qv1: Option<RawNumber>,
}

impl TimeSeriesPoint {
    /// The parsed `date`, if there is one and it reads as ISO-8601.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date)
    }

    /// Unix seconds of `date`; `None` stands in for an unreadable date.
    pub fn unix_time(&self) -> Option<i64> {
        self.datetime().map(unix_seconds)
    }
}

/// Zero when the field is absent, otherwise whatever [`RawNumber::parse`] makes of it.
pub(crate) fn number_or_zero(field: Option<&RawNumber>) -> f64 {
    field.map_or(0.0, RawNumber::parse)
}

/// Keep string dates; a number, boolean or any other JSON kind counts as no date at all.
fn de_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(date)) => Ok(Some(date)),
        Some(other) => {
            trace!("ignoring non-string date {other}");
            Ok(None)
        }
        None => Ok(None),
    }
}

// -------------------------------------------------------------------------------------------------

/// A numeric field as it was found in the source record.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(Value),
}

impl RawNumber {
    /// Read the value as a float, falling back to `0.0`.
    ///
    /// Strings are read like a lenient float parser would: leading whitespace is skipped and
    /// the longest numeric prefix wins, so `"12.5kg"` is `12.5` and `"abc"` is `0.0`.
    /// Booleans, arrays and objects are always `0.0`.
    pub fn parse(&self) -> f64 {
        let value = match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => parse_leading_float(s),
            RawNumber::Other(_) => None,
        };
        match value {
            Some(v) if !v.is_nan() => v,
            _ => 0.0,
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Longest prefix of `s` (after leading whitespace) that reads as a decimal float.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    // sign
    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };

    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    // integer part
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    // fraction; a lone "." only counts when digits sit on one side of it
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - end - 1;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // exponent, only when it carries digits
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

////////////////////////////////////////////////////////////////////////////////////////////////////
