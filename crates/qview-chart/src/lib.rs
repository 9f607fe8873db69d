//! Chart-data reshaping for stock and Q-index time series.
//!
//! Records arrive as loosely-typed [`TimeSeriesPoint`]s (strings, numbers, nulls, missing
//! fields) and leave as the point shapes a charting library draws: candlesticks, lines and
//! coloured histogram bars. Every transform here is total; bad input degrades to zeros or
//! `null` times instead of failing.
//!
//! ```rust
//! use qview_chart::{filter_by_period, format_candlestick_data, Period, TimeSeriesPoint};
//!
//! let points: Vec<TimeSeriesPoint> = serde_json::from_str(r#"[
//!     {"date": "2024-01-01T00:00:00Z", "open": "10", "high": "12", "low": "9", "close": "11"}
//! ]"#).unwrap();
//!
//! let candles = format_candlestick_data(&points);
//! assert_eq!(candles[0].time, Some(1_704_067_200));
//!
//! let recent = filter_by_period(&points, Period::from("1y"));
//! # let _ = recent;
//! ```

pub mod format;
pub mod io;
pub mod period;
pub mod point;
pub mod time;

pub use crate::format::{
    format_candlestick_data, format_histogram_data, format_line_data, BarColor, Candle,
    HistogramBar, LineField, LinePoint, Timed,
};
pub use crate::io::read_points;
pub use crate::period::{filter_by_period, filter_by_period_at, Period};
pub use crate::point::{RawNumber, TimeSeriesPoint};
