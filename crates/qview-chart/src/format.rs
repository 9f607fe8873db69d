use crate::point::{number_or_zero, RawNumber, TimeSeriesPoint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Chart series
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Candlestick series point.
///
/// ```json
/// { "time": 1704067200, "open": 10.0, "high": 12.0, "low": 9.0, "close": 11.0 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Candle {
    /// Unix seconds; `null` when the source date was unreadable
    pub time: Option<i64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Line series point.
///
/// ```json
/// { "time": 1704067200, "value": -0.42 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LinePoint {
    pub time: Option<i64>,
    pub value: f64,
}

/// Histogram series point, coloured by sign.
///
/// ```json
/// { "time": 1704067200, "value": -5.0, "color": "#ef5350" }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistogramBar {
    pub time: Option<i64>,
    pub value: f64,
    pub color: BarColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BarColor {
    #[serde(rename = "#26a69a")]
    Positive,
    #[serde(rename = "#ef5350")]
    Negative,
}

impl BarColor {
    /// Zero counts as positive.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            BarColor::Positive
        } else {
            BarColor::Negative
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// The indicators a line series can be drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    TrendQ,
    Fq,
}

impl LineField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineField::TrendQ => "trend_q",
            LineField::Fq => "fq",
        }
    }

    fn select<'a>(&self, point: &'a TimeSeriesPoint) -> Option<&'a RawNumber> {
        match self {
            LineField::TrendQ => point.trend_q.as_ref(),
            LineField::Fq => point.fq.as_ref(),
        }
    }
}

impl FromStr for LineField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trend_q" => Ok(LineField::TrendQ),
            "fq" => Ok(LineField::Fq),
            other => Err(anyhow::anyhow!(
                "unknown line field \"{other}\"; expected \"trend_q\" or \"fq\""
            )),
        }
    }
}

impl fmt::Display for LineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Formatters
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Anything plotted against a Unix-seconds x-axis.
pub trait Timed {
    fn time(&self) -> Option<i64>;
}

impl Timed for Candle {
    fn time(&self) -> Option<i64> {
        self.time
    }
}

impl Timed for LinePoint {
    fn time(&self) -> Option<i64> {
        self.time
    }
}

impl Timed for HistogramBar {
    fn time(&self) -> Option<i64> {
        self.time
    }
}

/// Ascending by time. Points without a time go last, in their input order.
fn sort_by_time<T: Timed>(series: &mut [T]) {
    series.sort_by_key(|point| (point.time().is_none(), point.time()));
}

pub fn format_candlestick_data(points: &[TimeSeriesPoint]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = points
        .iter()
        .map(|point| Candle {
            time: point.unix_time(),
            open: number_or_zero(point.open.as_ref()),
            high: number_or_zero(point.high.as_ref()),
            low: number_or_zero(point.low.as_ref()),
            close: number_or_zero(point.close.as_ref()),
        })
        .collect();
    sort_by_time(&mut candles);
    candles
}

pub fn format_line_data(points: &[TimeSeriesPoint], field: LineField) -> Vec<LinePoint> {
    let mut line: Vec<LinePoint> = points
        .iter()
        .map(|point| LinePoint {
            time: point.unix_time(),
            value: number_or_zero(field.select(point)),
        })
        .collect();
    sort_by_time(&mut line);
    line
}

/// `qv1` as a histogram, green at or above zero and red below.
pub fn format_histogram_data(points: &[TimeSeriesPoint]) -> Vec<HistogramBar> {
    let mut bars: Vec<HistogramBar> = points
        .iter()
        .map(|point| {
            let value = number_or_zero(point.qv1.as_ref());
            HistogramBar {
                time: point.unix_time(),
                value,
                color: BarColor::of(value),
            }
        })
        .collect();
    sort_by_time(&mut bars);
    bars
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn points(value: serde_json::Value) -> Vec<TimeSeriesPoint> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn candlestick_reads_string_prices() {
        let data = points(json!([
            {"date": "2024-01-01T00:00:00Z", "open": "10", "high": "12", "low": "9", "close": "11"}
        ]));

        assert_eq!(
            format_candlestick_data(&data),
            vec![Candle {
                time: Some(1_704_067_200),
                open: 10.0,
                high: 12.0,
                low: 9.0,
                close: 11.0,
            }]
        );
    }

    #[test]
    fn candlestick_sorts_and_zero_fills() {
        let data = points(json!([
            {"date": "2024-01-03", "open": 3, "close": "n/a"},
            {"date": "garbage", "open": 9},
            {"date": "2024-01-01", "open": 1, "high": null},
            {"date": "2024-01-02", "open": 2}
        ]));

        let candles = format_candlestick_data(&data);
        let times: Vec<_> = candles.iter().map(|c| c.time).collect();
        assert_eq!(
            times,
            vec![Some(1_704_067_200), Some(1_704_153_600), Some(1_704_240_000), None]
        );
        assert_eq!(candles[0].high, 0.0);
        assert_eq!(candles[2].close, 0.0);
        assert_eq!(candles[3].open, 9.0);
    }

    #[test]
    fn line_selects_field() {
        let data = points(json!([
            {"date": "2024-01-02", "trend_q": "0.5", "fq": 7},
            {"date": "2024-01-01", "trend_q": -1.5}
        ]));

        let trend: Vec<f64> = format_line_data(&data, LineField::TrendQ)
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(trend, vec![-1.5, 0.5]);

        // missing fq is zero, not an error
        let fq: Vec<f64> = format_line_data(&data, LineField::Fq)
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(fq, vec![0.0, 7.0]);
    }

    #[test]
    fn histogram_colours_by_sign() {
        let data = points(json!([
            {"date": "2024-01-01", "qv1": -5},
            {"date": "2024-01-02", "qv1": 0},
            {"date": "2024-01-03", "qv1": "3.5"},
            {"date": "2024-01-04"}
        ]));

        let colors: Vec<BarColor> = format_histogram_data(&data)
            .iter()
            .map(|bar| bar.color)
            .collect();
        assert_eq!(
            colors,
            vec![
                BarColor::Negative,
                BarColor::Positive,
                BarColor::Positive,
                BarColor::Positive
            ]
        );
    }

    #[test]
    fn histogram_serializes_hex_colours() {
        let bar = HistogramBar {
            time: None,
            value: -1.0,
            color: BarColor::Negative,
        };
        assert_eq!(
            serde_json::to_value(&bar).unwrap(),
            json!({"time": null, "value": -1.0, "color": "#ef5350"})
        );
    }

    #[test]
    fn line_field_from_str() {
        assert_eq!("trend_q".parse::<LineField>().unwrap(), LineField::TrendQ);
        assert_eq!("fq".parse::<LineField>().unwrap(), LineField::Fq);
        assert!("qv1".parse::<LineField>().is_err());
        assert!("FQ".parse::<LineField>().is_err());
    }
}
