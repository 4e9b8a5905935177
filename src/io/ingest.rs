//! CSV ingest and cleaning for the Mauna Loa monthly in-situ record.
//!
//! The Scripps export starts with a fixed-length comment preamble, followed by
//! a header row and one comma-separated row per month. Months without a
//! measurement carry the sentinel `-99.99`.
//!
//! Design goals:
//! - **Strict schema**: the header and every data row must have ten columns
//! - **Row-level validation**: unparseable rows are skipped and reported
//! - **Completeness**: a row with any missing value is dropped entirely
//! - **No reordering**: file order is chronological order

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{Co2Row, Observation, ViewConfig};
use crate::error::LoadError;

/// Column names in file order.
pub const COLUMNS: [&str; 10] = [
    "year",
    "month",
    "date_int",
    "date",
    "raw_co2",
    "seasonally_adjusted",
    "fit",
    "seasonally_adjusted_fit",
    "co2_filled",
    "seasonally_adjusted_filled",
];

/// Summary stats about the observations that survived cleaning.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub date_min: f64,
    pub date_max: f64,
    pub raw_min: f64,
    pub raw_max: f64,
    pub adjusted_min: f64,
    pub adjusted_max: f64,
    pub first_month: NaiveDate,
    pub last_month: NaiveDate,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: cleaned observations + stats + what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows dropped because at least one column was missing.
    pub rows_dropped: usize,
}

impl IngestedData {
    /// Build an ingest result from observations that are already clean.
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self, LoadError> {
        let stats = compute_stats(&observations).ok_or(LoadError::Empty)?;
        let rows_read = observations.len();
        Ok(Self {
            observations,
            stats,
            row_errors: Vec::new(),
            rows_read,
            rows_dropped: 0,
        })
    }

    pub fn dates(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.date).collect()
    }
}

/// Load the CO2 record described by `config`.
pub fn load_observations(config: &ViewConfig) -> Result<IngestedData, LoadError> {
    let text = read_text(&config.data_path)?;
    let data = parse_observations(&text, config.preamble_rows, config.missing_sentinel)?;

    info!(
        path = %config.data_path.display(),
        rows_read = data.rows_read,
        rows_used = data.observations.len(),
        rows_dropped = data.rows_dropped,
        "loaded CO2 record"
    );
    for err in &data.row_errors {
        warn!(line = err.line, "skipped row: {}", err.message);
    }

    Ok(data)
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse the record from in-memory text.
///
/// `preamble_rows` lines are discarded, the next line must be the header.
pub fn parse_observations(text: &str, preamble_rows: usize, sentinel: f64) -> Result<IngestedData, LoadError> {
    let body = skip_lines(text, preamble_rows)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let header_line = preamble_rows + 1;
    let headers = reader
        .headers()
        .map_err(|e| LoadError::Header(e.to_string()))?
        .clone();
    if headers.len() != COLUMNS.len() {
        return Err(LoadError::ColumnCount {
            line: header_line,
            expected: COLUMNS.len(),
            found: headers.len(),
        });
    }

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| LoadError::Parse {
            line: e.position().map(|p| p.line() as usize + preamble_rows).unwrap_or(header_line),
            message: e.to_string(),
        })?;
        // csv positions are 1-based and count the header line.
        let line = record
            .position()
            .map(|p| p.line() as usize + preamble_rows)
            .unwrap_or(header_line + rows_read + 1);
        rows_read += 1;

        if record.len() != COLUMNS.len() {
            return Err(LoadError::ColumnCount {
                line,
                expected: COLUMNS.len(),
                found: record.len(),
            });
        }

        match parse_row(&record, sentinel) {
            Ok(Some(row)) => match normalize_row(&row) {
                Ok(Some(obs)) => observations.push(obs),
                Ok(None) => rows_dropped += 1,
                Err(message) => row_errors.push(RowError { line, message }),
            },
            Ok(None) => rows_dropped += 1,
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if observations.windows(2).any(|w| w[1].date < w[0].date) {
        warn!("CO2 record is not in ascending date order; keeping file order");
    }

    let stats = compute_stats(&observations).ok_or(LoadError::Empty)?;

    Ok(IngestedData {
        observations,
        stats,
        row_errors,
        rows_read,
        rows_dropped,
    })
}

fn skip_lines(text: &str, n: usize) -> Result<&str, LoadError> {
    let mut rest = text;
    for found in 0..n {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => {
                return Err(LoadError::TruncatedPreamble {
                    expected: n,
                    found: found + usize::from(!rest.is_empty()),
                });
            }
        }
    }
    Ok(rest)
}

/// Parse one record; `Ok(None)` means the year or month cell is missing.
fn parse_row(record: &StringRecord, sentinel: f64) -> Result<Option<Co2Row>, String> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let (Some(year), Some(month)) = (
        parse_int(field(0), COLUMNS[0], sentinel)?,
        parse_int(field(1), COLUMNS[1], sentinel)?,
    ) else {
        return Ok(None);
    };
    let month = u32::try_from(month).map_err(|_| format!("Invalid `month` value '{month}'."))?;

    Ok(Some(Co2Row {
        year,
        month,
        date_index: parse_value(field(2), COLUMNS[2], sentinel)?,
        date: parse_value(field(3), COLUMNS[3], sentinel)?,
        co2: parse_value(field(4), COLUMNS[4], sentinel)?,
        seasonally_adjusted: parse_value(field(5), COLUMNS[5], sentinel)?,
        fit: parse_value(field(6), COLUMNS[6], sentinel)?,
        seasonally_adjusted_fit: parse_value(field(7), COLUMNS[7], sentinel)?,
        co2_filled: parse_value(field(8), COLUMNS[8], sentinel)?,
        seasonally_adjusted_filled: parse_value(field(9), COLUMNS[9], sentinel)?,
    }))
}

/// Turn a parsed row into an observation; `Ok(None)` drops incomplete rows.
fn normalize_row(row: &Co2Row) -> Result<Option<Observation>, String> {
    if !row.is_complete() {
        return Ok(None);
    }
    let (Some(date), Some(raw), Some(adjusted)) = (row.date, row.co2, row.seasonally_adjusted) else {
        return Ok(None);
    };

    let month = NaiveDate::from_ymd_opt(row.year, row.month, 1)
        .ok_or_else(|| format!("Invalid year/month {}-{}.", row.year, row.month))?;

    // The fractional date should fall inside the labelled calendar year.
    if date.floor() as i32 != month.year() {
        return Err(format!(
            "Fractional date {date} does not match year {}.",
            month.year()
        ));
    }

    Ok(Some(Observation {
        month,
        date,
        raw,
        adjusted,
    }))
}

fn parse_value(s: &str, name: &str, sentinel: f64) -> Result<Option<f64>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    if v.is_nan() {
        return Ok(None);
    }
    if v.is_infinite() {
        return Err(format!("Non-finite `{name}` value '{s}'."));
    }
    if is_sentinel(v, sentinel) {
        return Ok(None);
    }
    Ok(Some(v))
}

fn parse_int(s: &str, name: &str, sentinel: f64) -> Result<Option<i32>, String> {
    let Some(v) = parse_value(s, name, sentinel)? else {
        return Ok(None);
    };
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return Err(format!("Invalid `{name}` value '{s}' (expected an integer)."));
    }
    Ok(Some(v as i32))
}

fn is_sentinel(v: f64, sentinel: f64) -> bool {
    (v - sentinel).abs() < 1e-9
}

fn compute_stats(observations: &[Observation]) -> Option<DatasetStats> {
    let first = observations.first()?;
    let last = observations.last()?;

    let mut stats = DatasetStats {
        n_points: observations.len(),
        date_min: f64::INFINITY,
        date_max: f64::NEG_INFINITY,
        raw_min: f64::INFINITY,
        raw_max: f64::NEG_INFINITY,
        adjusted_min: f64::INFINITY,
        adjusted_max: f64::NEG_INFINITY,
        first_month: first.month,
        last_month: last.month,
    };

    for o in observations {
        stats.date_min = stats.date_min.min(o.date);
        stats.date_max = stats.date_max.max(o.date);
        stats.raw_min = stats.raw_min.min(o.raw);
        stats.raw_max = stats.raw_max.max(o.raw);
        stats.adjusted_min = stats.adjusted_min.min(o.adjusted);
        stats.adjusted_max = stats.adjusted_max.max(o.adjusted);
    }

    Some(stats)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::MISSING_SENTINEL;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const HEADER: &str =
        "Yr,Mn,Date,Date,CO2,seasonally,fit,seasonally,CO2,seasonally";

    /// Build a record with a short preamble (3 lines) and the given data rows.
    pub(crate) fn fixture(rows: &[&str]) -> String {
        let mut text = String::from(
            "\" Atmospheric CO2 concentrations (ppm)\"\n\" derived from in situ air measurements\"\n\n",
        );
        text.push_str(HEADER);
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    pub(crate) const ROWS: [&str; 5] = [
        "1958,  1,21200,1958.0411,  -99.99,  -99.99,  -99.99,  -99.99,  -99.99,  -99.99",
        "1958,  3,21259,1958.2027,  315.71,  314.44,  316.20,  314.91,  315.71,  314.44",
        "1958,  4,21290,1958.2877,  317.45,  315.16,  317.30,  314.99,  317.45,  315.16",
        "1958,  5,21320,1958.3699,  317.51,  314.71,  317.87,  315.07,  317.51,  314.71",
        "1958,  6,21351,1958.4548,  -99.99,  -99.99,  317.25,  315.14,  317.25,  315.14",
    ];

    #[test]
    fn drops_rows_with_missing_values() {
        let data = parse_observations(&fixture(&ROWS), 3, MISSING_SENTINEL).unwrap();
        assert_eq!(data.rows_read, 5);
        assert_eq!(data.rows_dropped, 2);
        assert_eq!(data.observations.len(), 3);
        assert!(data.row_errors.is_empty());

        // Post-filter invariant: every observation is complete and finite.
        for o in &data.observations {
            assert!(o.raw.is_finite() && o.raw != MISSING_SENTINEL);
            assert!(o.adjusted.is_finite() && o.adjusted != MISSING_SENTINEL);
        }

        let first = data.observations[0];
        assert!((first.date - 1958.2027).abs() < 1e-12);
        assert!((first.raw - 315.71).abs() < 1e-12);
        assert!((first.adjusted - 314.44).abs() < 1e-12);
        assert_eq!(first.month, NaiveDate::from_ymd_opt(1958, 3, 1).unwrap());
    }

    #[test]
    fn keeps_file_order_and_stats() {
        let data = parse_observations(&fixture(&ROWS), 3, MISSING_SENTINEL).unwrap();
        let dates = data.dates();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(data.stats.n_points, 3);
        assert!((data.stats.date_min - 1958.2027).abs() < 1e-12);
        assert!((data.stats.date_max - 1958.3699).abs() < 1e-12);
        assert!((data.stats.raw_max - 317.51).abs() < 1e-12);
        assert!((data.stats.adjusted_min - 314.44).abs() < 1e-12);
        assert_eq!(data.stats.last_month, NaiveDate::from_ymd_opt(1958, 5, 1).unwrap());
    }

    #[test]
    fn empty_cells_count_as_missing() {
        let rows = ["1958,  3,21259,1958.2027,  315.71,,  316.20,  314.91,  315.71,  314.44", ROWS[2]];
        let data = parse_observations(&fixture(&rows), 3, MISSING_SENTINEL).unwrap();
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.rows_dropped, 1);
    }

    #[test]
    fn nan_cells_count_as_missing() {
        let rows = [ROWS[1], "1958,  4,21290,1958.2877,  NaN,  315.16,  317.30,  314.99,  317.45,  315.16"];
        let data = parse_observations(&fixture(&rows), 3, MISSING_SENTINEL).unwrap();
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.rows_dropped, 1);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn non_numeric_rows_are_reported_and_skipped() {
        let rows = [ROWS[1], "1958,  4,21290,1958.2877,  abc,  315.16,  317.30,  314.99,  317.45,  315.16"];
        let data = parse_observations(&fixture(&rows), 3, MISSING_SENTINEL).unwrap();
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 6);
        assert!(data.row_errors[0].message.contains("raw_co2"));
    }

    #[test]
    fn impossible_month_is_a_row_error() {
        let rows = [ROWS[1], "1958, 13,21290,1958.9877,  317.45,  315.16,  317.30,  314.99,  317.45,  315.16"];
        let data = parse_observations(&fixture(&rows), 3, MISSING_SENTINEL).unwrap();
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.row_errors.len(), 1);
    }

    #[test]
    fn wrong_column_count_is_fatal() {
        let rows = [ROWS[1], "1958,  4,21290,1958.2877,  317.45"];
        let err = parse_observations(&fixture(&rows), 3, MISSING_SENTINEL).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ColumnCount {
                expected: 10,
                found: 5,
                ..
            }
        ));

        let bad_header = "\n\n\nYr,Mn,Date\n".to_string();
        let err = parse_observations(&bad_header, 3, MISSING_SENTINEL).unwrap_err();
        assert!(matches!(err, LoadError::ColumnCount { line: 4, found: 3, .. }));
    }

    #[test]
    fn all_missing_is_empty_error() {
        let err = parse_observations(&fixture(&[ROWS[0], ROWS[4]]), 3, MISSING_SENTINEL).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn short_file_reports_truncated_preamble() {
        let err = parse_observations("one\ntwo\n", 56, MISSING_SENTINEL).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TruncatedPreamble {
                expected: 56,
                found: 2
            }
        ));
    }

    #[test]
    fn loads_from_disk_and_reports_missing_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", fixture(&ROWS)).unwrap();

        let config = ViewConfig {
            data_path: file.path().to_path_buf(),
            preamble_rows: 3,
            ..ViewConfig::default()
        };
        let data = load_observations(&config).unwrap();
        assert_eq!(data.observations.len(), 3);

        let missing = ViewConfig {
            data_path: file.path().with_extension("does-not-exist"),
            ..config
        };
        assert!(matches!(load_observations(&missing), Err(LoadError::Open { .. })));
    }
}
