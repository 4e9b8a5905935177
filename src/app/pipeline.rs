//! Shared start-up logic used by both the TUI and the headless commands.
//!
//! Keeping this in one place avoids duplicating the workflow:
//! load CSV -> clamp initial controls -> build controller (initialises the figure)

use crate::controls::Controls;
use crate::domain::ViewConfig;
use crate::error::AppError;
use crate::io::load_observations;
use crate::view::{Figure, ViewController};

/// Load the record and build a controller with a fresh in-memory figure.
pub fn build_view(config: &ViewConfig) -> Result<ViewController<Figure>, AppError> {
    let data = load_observations(config)?;
    let controls = Controls::new(config.initial);
    Ok(ViewController::new(data, controls, Figure::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimeRange, ViewSnapshot};
    use crate::error::EXIT_INPUT;
    use crate::io::ingest::tests::{ROWS, fixture};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builds_view_with_requested_initial_state() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", fixture(&ROWS)).unwrap();

        let config = ViewConfig {
            data_path: file.path().to_path_buf(),
            preamble_rows: 3,
            initial: ViewSnapshot {
                range: TimeRange::AllData,
                ..ViewSnapshot::default()
            },
            ..ViewConfig::default()
        };
        let controller = build_view(&config).unwrap();
        assert_eq!(controller.surface().traces.len(), 3);
        assert_eq!(controller.snapshot().range, TimeRange::AllData);
        assert_eq!(controller.surface().visibility.as_ref().unwrap().shown.len(), 12);
    }

    #[test]
    fn missing_file_is_fatal_input_error() {
        let config = ViewConfig {
            data_path: "definitely/not/here.csv".into(),
            ..ViewConfig::default()
        };
        let err = build_view(&config).err().unwrap();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }
}
