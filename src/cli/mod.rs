//! Command-line parsing for the CO2 trend-line explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the view/controller code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_DATA_PATH, DEFAULT_PREAMBLE_ROWS, MISSING_SENTINEL, SignalType, TimeRange, TrendParams, ViewConfig,
    ViewSnapshot,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "co2", version, about = "Mauna Loa CO2 trend-line explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (default).
    Tui(ViewArgs),
    /// Print dataset stats, current predictions and least-squares reference fits.
    Summary(SummaryArgs),
    /// Print an ASCII rendering of the chart.
    Plot(PlotArgs),
}

/// Data source and initial control values, shared by all subcommands.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Monthly in-situ CO2 CSV (Scripps format).
    #[arg(short = 'f', long = "data", env = "CO2_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Number of preamble rows before the header line.
    #[arg(long, default_value_t = DEFAULT_PREAMBLE_ROWS)]
    pub skip_rows: usize,

    /// Value that marks a missing measurement.
    #[arg(long, default_value_t = MISSING_SENTINEL, allow_negative_numbers = true)]
    pub missing: f64,

    /// Initial signal type.
    #[arg(long, value_enum, default_value_t = SignalType::SeasonallyAdjusted)]
    pub signal: SignalType,

    /// Initial time range.
    #[arg(long, value_enum, default_value_t = TimeRange::First5Years)]
    pub range: TimeRange,

    /// Initial slope for the first-5-years line (ppm/yr, clamped to [0, 3]).
    #[arg(long, default_value_t = 2.0)]
    pub slope_first: f64,

    /// Initial intercept for the first-5-years line (ppm, clamped to [250, 320]).
    #[arg(long, default_value_t = 312.0)]
    pub intercept_first: f64,

    /// Initial slope for the last-5-years line (ppm/yr, clamped to [0, 3]).
    #[arg(long, default_value_t = 1.65)]
    pub slope_last: f64,

    /// Initial intercept for the last-5-years line (ppm, clamped to [250, 320]).
    #[arg(long, default_value_t = 312.0)]
    pub intercept_last: f64,

    /// Write logs to this file (the TUI does not log otherwise).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options for `co2 summary`.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Print the full figure state as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Options for `co2 plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

impl ViewArgs {
    pub fn to_config(&self) -> ViewConfig {
        ViewConfig {
            data_path: self.data.clone(),
            preamble_rows: self.skip_rows,
            missing_sentinel: self.missing,
            initial: ViewSnapshot {
                first: TrendParams {
                    slope: self.slope_first,
                    intercept: self.intercept_first,
                },
                last: TrendParams {
                    slope: self.slope_last,
                    intercept: self.intercept_last,
                },
                signal: self.signal,
                range: self.range,
            },
        }
    }
}

/// Rewrite argv so `co2` defaults to `co2 tui`.
///
/// Rules:
/// - `co2`                      -> `co2 tui`
/// - `co2 --data x.csv ...`     -> `co2 tui --data x.csv ...`
/// - `co2 --help/--version/-h`  -> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "summary" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(args(&["co2"])), args(&["co2", "tui"]));
        assert_eq!(
            rewrite_args(args(&["co2", "--range", "all"])),
            args(&["co2", "tui", "--range", "all"])
        );
        assert_eq!(rewrite_args(args(&["co2", "--help"])), args(&["co2", "--help"]));
        assert_eq!(rewrite_args(args(&["co2", "plot"])), args(&["co2", "plot"]));
    }

    #[test]
    fn parses_initial_controls() {
        let cli = Cli::parse_from(args(&[
            "co2",
            "summary",
            "--data",
            "x.csv",
            "--signal",
            "raw",
            "--range",
            "last",
            "--slope-last",
            "1.9",
            "--json",
        ]));
        let Command::Summary(summary) = cli.command else {
            panic!("expected summary");
        };
        assert!(summary.json);
        let config = summary.view.to_config();
        assert_eq!(config.data_path, PathBuf::from("x.csv"));
        assert_eq!(config.preamble_rows, 56);
        assert_eq!(config.initial.signal, SignalType::Raw);
        assert_eq!(config.initial.range, TimeRange::Last5Years);
        assert_eq!(config.initial.last.slope, 1.9);
        assert_eq!(config.initial.first.slope, 2.0);
    }
}
