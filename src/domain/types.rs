//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held by the controls and the controller during an interactive session
//! - printed as JSON by `co2 summary --json`

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Slope slider bounds (ppm per year).
pub const SLOPE_BOUNDS: [f64; 2] = [0.0, 3.0];
/// Intercept slider bounds (ppm). Both segments share the same range.
pub const INTERCEPT_BOUNDS: [f64; 2] = [250.0, 320.0];
pub const SLOPE_STEP: f64 = 0.05;
pub const INTERCEPT_STEP: f64 = 0.25;

/// Year used as the origin of the title's extrapolated predictions.
pub const PREDICTION_REFERENCE_YEAR: f64 = 1958.0;
/// Year the title extrapolates both trend lines to.
pub const PREDICTION_TARGET_YEAR: f64 = 2030.0;

/// Number of leading rows (comments + blank lines) in the Scripps export.
pub const DEFAULT_PREAMBLE_ROWS: usize = 56;
/// Sentinel the record uses for "no value".
pub const MISSING_SENTINEL: f64 = -99.99;
pub const DEFAULT_DATA_PATH: &str = "data/monthly_in_situ_co2_mlo.csv";

/// Which observed signal the scatter trace shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    /// Seasonally adjusted monthly mean.
    #[value(name = "adjusted")]
    SeasonallyAdjusted,
    /// Raw monthly mean.
    Raw,
}

impl SignalType {
    /// Selector order, as shown in the UI.
    pub const ALL: [SignalType; 2] = [SignalType::SeasonallyAdjusted, SignalType::Raw];

    pub fn display_name(self) -> &'static str {
        match self {
            SignalType::SeasonallyAdjusted => "Seasonally adjusted data",
            SignalType::Raw => "Raw data",
        }
    }
}

/// Which window of the record the view is zoomed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    #[value(name = "first")]
    #[serde(rename = "first_5_years")]
    First5Years,
    #[value(name = "last")]
    #[serde(rename = "last_5_years")]
    Last5Years,
    #[value(name = "all")]
    AllData,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::First5Years, TimeRange::Last5Years, TimeRange::AllData];

    pub fn display_name(self) -> &'static str {
        match self {
            TimeRange::First5Years => "first 5 years",
            TimeRange::Last5Years => "last 5 years",
            TimeRange::AllData => "All data",
        }
    }
}

/// One of the two trend-line regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    First,
    Last,
}

impl Segment {
    pub const ALL: [Segment; 2] = [Segment::First, Segment::Last];

    /// Word used in labels and the title ("first" / "last").
    pub fn label(self) -> &'static str {
        match self {
            Segment::First => "first",
            Segment::Last => "last",
        }
    }

    /// Index of this segment's line trace on the figure.
    pub fn trace_index(self) -> usize {
        match self {
            Segment::First => 1,
            Segment::Last => 2,
        }
    }
}

/// A single parsed CSV row before completeness filtering.
///
/// Numeric fields are `None` when empty or equal to the missing sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Co2Row {
    pub year: i32,
    pub month: u32,
    pub date_index: Option<f64>,
    pub date: Option<f64>,
    pub co2: Option<f64>,
    pub seasonally_adjusted: Option<f64>,
    pub fit: Option<f64>,
    pub seasonally_adjusted_fit: Option<f64>,
    pub co2_filled: Option<f64>,
    pub seasonally_adjusted_filled: Option<f64>,
}

impl Co2Row {
    /// True when every column carries a value.
    pub fn is_complete(&self) -> bool {
        [
            self.date_index,
            self.date,
            self.co2,
            self.seasonally_adjusted,
            self.fit,
            self.seasonally_adjusted_fit,
            self.co2_filled,
            self.seasonally_adjusted_filled,
        ]
        .iter()
        .all(Option::is_some)
    }
}

/// A complete monthly observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    /// First day of the observed month.
    pub month: NaiveDate,
    /// Fractional year (e.g. 1958.2027).
    pub date: f64,
    /// Raw monthly mean (ppm).
    pub raw: f64,
    /// Seasonally adjusted monthly mean (ppm).
    pub adjusted: f64,
}

impl Observation {
    pub fn value(&self, signal: SignalType) -> f64 {
        match signal {
            SignalType::Raw => self.raw,
            SignalType::SeasonallyAdjusted => self.adjusted,
        }
    }
}

/// Slope/intercept pair for one trend line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendParams {
    pub slope: f64,
    pub intercept: f64,
}

/// The current value of all six interactive controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub first: TrendParams,
    pub last: TrendParams,
    pub signal: SignalType,
    pub range: TimeRange,
}

impl ViewSnapshot {
    pub fn params(&self, segment: Segment) -> TrendParams {
        match segment {
            Segment::First => self.first,
            Segment::Last => self.last,
        }
    }
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            first: TrendParams {
                slope: 2.0,
                intercept: 312.0,
            },
            last: TrendParams {
                slope: 1.65,
                intercept: 312.0,
            },
            signal: SignalType::SeasonallyAdjusted,
            range: TimeRange::First5Years,
        }
    }
}

/// Axis bounds applied to the figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRanges {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// A full session's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub data_path: PathBuf,
    pub preamble_rows: usize,
    pub missing_sentinel: f64,
    /// Requested initial control values (clamped by the controls).
    pub initial: ViewSnapshot,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            preamble_rows: DEFAULT_PREAMBLE_ROWS,
            missing_sentinel: MISSING_SENTINEL,
            initial: ViewSnapshot::default(),
        }
    }
}
