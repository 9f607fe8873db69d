use crate::point::TimeSeriesPoint;
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Look-back windows
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A relative look-back window, tagged `3m`, `6m`, `1y` or `5y`.
///
/// Parsing never fails: an unknown tag becomes [`Period::ThreeMonths`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Period {
    #[default]
    ThreeMonths,
    SixMonths,
    OneYear,
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::OneYear => 12,
            Period::FiveYears => 60,
        }
    }

    /// The earliest instant this window admits, counted back from `now`.
    ///
    /// Month arithmetic clamps to the end of shorter months (31 May - 3m = 29 Feb in 2024).
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.months()))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl From<&str> for Period {
    fn from(tag: &str) -> Self {
        match tag {
            "3m" => Period::ThreeMonths,
            "6m" => Period::SixMonths,
            "1y" => Period::OneYear,
            "5y" => Period::FiveYears,
            other => {
                debug!("unrecognised period \"{other}\", falling back to 3m");
                Period::ThreeMonths
            }
        }
    }
}

impl From<String> for Period {
    fn from(tag: String) -> Self {
        Period::from(tag.as_str())
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.as_str().to_string()
    }
}

impl FromStr for Period {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Period::from(s))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -------------------------------------------------------------------------------------------------

/// Keep the points dated on or after `period`'s cutoff, measured from the current time.
///
/// The clock is read once per call. Points with an unreadable date are dropped.
pub fn filter_by_period(points: &[TimeSeriesPoint], period: Period) -> Vec<TimeSeriesPoint> {
    filter_by_period_at(points, period, Utc::now())
}

/// [`filter_by_period`] against an explicit `now`.
pub fn filter_by_period_at(
    points: &[TimeSeriesPoint],
    period: Period,
    now: DateTime<Utc>,
) -> Vec<TimeSeriesPoint> {
    let cutoff = period.cutoff(now);
    let kept: Vec<TimeSeriesPoint> = points
        .iter()
        .filter(|point| point.datetime().is_some_and(|dt| dt >= cutoff))
        .cloned()
        .collect();
    trace!(
        "{period} window from {cutoff}: kept {} of {} points",
        kept.len(),
        points.len()
    );
    kept
}

////////////////////////////////////////////////////////////////////////////////////////////////////
