//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - builds the view controller from the CO2 record
//! - hands it to the TUI or prints a headless rendering

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, PlotArgs, SummaryArgs, ViewArgs};
use crate::error::{AppError, EXIT_INPUT};

pub mod pipeline;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Entry point for the `co2` binary.
pub fn run() -> Result<(), AppError> {
    // CO2_DATA / RUST_LOG may come from a dotenv file.
    dotenvy::dotenv().ok();

    let argv = crate::cli::rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Summary(args) => handle_summary(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_tui(args: ViewArgs) -> Result<(), AppError> {
    // The alternate screen owns stdout/stderr, so the TUI only logs to a file.
    if let Some(path) = &args.log_file {
        init_file_logging(path)?;
    }
    let controller = pipeline::build_view(&args.to_config())?;
    crate::tui::run(controller)
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    init_logging(args.view.log_file.as_deref())?;
    let controller = pipeline::build_view(&args.view.to_config())?;

    if args.json {
        let report = crate::report::summary_report(&controller);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::runtime(format!("Failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_summary(&controller));
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    init_logging(args.view.log_file.as_deref())?;
    let controller = pipeline::build_view(&args.view.to_config())?;

    let plot = crate::plot::render_ascii_plot(controller.surface(), args.width, args.height);
    print!("{plot}");
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Log to `path` if given, otherwise to stderr.
fn init_logging(path: Option<&Path>) -> Result<(), AppError> {
    match path {
        Some(path) => init_file_logging(path),
        None => {
            // A subscriber may already be installed (tests); that's fine.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
            Ok(())
        }
    }
}

fn init_file_logging(path: &Path) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create log file '{}': {e}", path.display())))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
