use anyhow::Result;
use clap::Parser;
use cli::{ChartKind, Cli, Commands, Commands::*, TraceLevel};
use dotenv::dotenv;
use qview_chart::{
    filter_by_period, format_candlestick_data, format_histogram_data, format_line_data,
    read_points, LineField, Period, TimeSeriesPoint,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;

fn preprocess(trace_level: Level) {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level);
    trace!("Command line input recorded: {cli:#?}");

    run(cli.command, &mut std::io::stdout().lock()).await
}

////////////////////////////////////////////////////////////////////////////////////////////////////

async fn run<W: Write>(command: Commands, out: &mut W) -> Result<()> {
    // cli framework:
    // "> qview <COMMAND>"
    match command {
        // "> qview chart [candlestick line histogram] <INPUT> --period 1y --field fq"
        // filter records to a window, then reshape them for the chart
        Chart {
            kind,
            input,
            period,
            field,
            pretty,
        } => {
            let window = load_window(&input, Period::from(period.as_str())).await?;

            match kind {
                ChartKind::Candlestick => emit(out, &format_candlestick_data(&window), pretty),
                ChartKind::Line => {
                    let field = LineField::from(field);
                    debug!("plotting {field}");
                    emit(out, &format_line_data(&window, field), pretty)
                }
                ChartKind::Histogram => emit(out, &format_histogram_data(&window), pretty),
            }
        }

        // ---------------------------------------------------------------------------
        // "> qview window <INPUT> --period 6m"
        // print the raw records inside the window
        Window {
            input,
            period,
            pretty,
        } => {
            let window = load_window(&input, Period::from(period.as_str())).await?;
            emit(out, &window, pretty)
        }
    }
}

async fn load_window(input: &Path, period: Period) -> Result<Vec<TimeSeriesPoint>> {
    let points = read_points(input).await?;
    let window = filter_by_period(&points, period);
    info!(
        "{} of {} records inside the {period} window",
        window.len(),
        points.len()
    );
    Ok(window)
}

fn emit<W: Write, T: Serialize + ?Sized>(out: &mut W, data: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, data)?;
    } else {
        serde_json::to_writer(&mut *out, data)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::FieldArg;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    // one record far in the future, one long gone, one without a readable date
    const RECORDS: &str = r#"[
        {"date": "2999-01-02", "open": 3, "high": 4, "low": 1, "close": 2, "trend_q": 0.5, "fq": "-1", "qv1": -7},
        {"date": "1990-01-01", "open": 9, "qv1": 9},
        {"date": "2999-01-01", "open": "1", "fq": 2, "qv1": "4"},
        {"date": 19900101, "open": 5}
    ]"#;

    async fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("qview-{}-{name}", std::process::id()));
        tokio::fs::write(&path, RECORDS).await.unwrap();
        path
    }

    async fn output(command: Commands) -> Value {
        let mut out = Vec::new();
        run(command, &mut out).await.unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[tokio::test]
    async fn chart_filters_then_formats() {
        let input = scratch("chart.json").await;

        let candles = output(Chart {
            kind: ChartKind::Candlestick,
            input: input.clone(),
            period: "5y".to_string(),
            field: FieldArg::TrendQ,
            pretty: false,
        })
        .await;
        assert_eq!(
            candles,
            json!([
                {"time": 32_472_144_000_i64, "open": 1.0, "high": 0.0, "low": 0.0, "close": 0.0},
                {"time": 32_472_230_400_i64, "open": 3.0, "high": 4.0, "low": 1.0, "close": 2.0}
            ])
        );

        let line = output(Chart {
            kind: ChartKind::Line,
            input: input.clone(),
            period: "1y".to_string(),
            field: FieldArg::Fq,
            pretty: true,
        })
        .await;
        assert_eq!(
            line,
            json!([
                {"time": 32_472_144_000_i64, "value": 2.0},
                {"time": 32_472_230_400_i64, "value": -1.0}
            ])
        );

        let bars = output(Chart {
            kind: ChartKind::Histogram,
            input: input.clone(),
            period: "forever".to_string(),
            field: FieldArg::TrendQ,
            pretty: false,
        })
        .await;
        assert_eq!(bars[0]["color"], "#26a69a");
        assert_eq!(bars[1]["color"], "#ef5350");
        assert_eq!(bars.as_array().map(Vec::len), Some(2));

        tokio::fs::remove_file(&input).await.unwrap();
    }

    #[tokio::test]
    async fn window_prints_the_records_it_keeps() {
        let input = scratch("window.json").await;

        let records = output(Window {
            input: input.clone(),
            period: "6m".to_string(),
            pretty: false,
        })
        .await;
        assert_eq!(
            records,
            json!([
                {"date": "2999-01-02", "open": 3.0, "high": 4.0, "low": 1.0, "close": 2.0, "trend_q": 0.5, "fq": "-1", "qv1": -7.0},
                {"date": "2999-01-01", "open": "1", "fq": 2.0, "qv1": "4"}
            ])
        );

        tokio::fs::remove_file(&input).await.unwrap();
    }

    #[tokio::test]
    async fn missing_input_is_an_error() {
        let mut out = Vec::new();
        let result = run(
            Window {
                input: PathBuf::from("/nonexistent/qview/records.json"),
                period: "3m".to_string(),
                pretty: false,
            },
            &mut out,
        )
        .await;
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
