use clap::{Parser, Subcommand, ValueEnum};
use qview_chart::LineField;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, default_value = "INFO")]
    pub trace: TraceLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reshape a JSON file of records into a chart series.
    Chart {
        kind: ChartKind,

        /// JSON array of records (`date`, `open`, `high`, `low`, `close`, `trend_q`, `fq`, `qv1`).
        input: PathBuf,

        /// Look-back window: 3m, 6m, 1y or 5y. Anything else means 3m.
        #[arg(long, default_value = "3m")]
        period: String,

        /// Indicator for `line` charts: trend_q or fq.
        #[arg(long, default_value = "trend_q")]
        field: FieldArg,

        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print the records of a JSON file that fall inside a look-back window.
    Window {
        input: PathBuf,

        #[arg(long, default_value = "3m")]
        period: String,

        #[arg(long)]
        pretty: bool,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Candlestick,
    Line,
    Histogram,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum FieldArg {
    TrendQ,
    Fq,
}

impl From<FieldArg> for LineField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::TrendQ => LineField::TrendQ,
            FieldArg::Fq => LineField::Fq,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_defaults() {
        let cli = Cli::try_parse_from(["qview", "chart", "line", "aapl.json"]).unwrap();
        assert_eq!(cli.trace, TraceLevel::INFO);
        match cli.command {
            Commands::Chart {
                kind,
                input,
                period,
                field,
                pretty,
            } => {
                assert_eq!(kind, ChartKind::Line);
                assert_eq!(input, PathBuf::from("aapl.json"));
                assert_eq!(period, "3m");
                assert_eq!(field, FieldArg::TrendQ);
                assert_eq!(LineField::from(field), LineField::TrendQ);
                assert!(!pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn window_with_flags() {
        let cli = Cli::try_parse_from([
            "qview", "--trace", "DEBUG", "window", "aapl.json", "--period", "5y", "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.trace, TraceLevel::DEBUG);
        assert!(matches!(
            cli.command,
            Commands::Window { ref period, pretty: true, .. } if period == "5y"
        ));
    }

    #[test]
    fn rejects_unknown_chart_kind() {
        assert!(Cli::try_parse_from(["qview", "chart", "pie", "aapl.json"]).is_err());
    }

    #[test]
    fn line_field_is_checked_at_parse_time() {
        let cli =
            Cli::try_parse_from(["qview", "chart", "line", "aapl.json", "--field", "fq"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chart {
                field: FieldArg::Fq,
                ..
            }
        ));

        // rejected even for chart kinds that never read the field
        for kind in ["line", "histogram"] {
            let parsed =
                Cli::try_parse_from(["qview", "chart", kind, "aapl.json", "--field", "qv1"]);
            assert!(parsed.is_err(), "{kind}");
        }
    }
}
