use std::path::PathBuf;

/// Exit code for input/data problems (missing file, schema mismatch).
pub const EXIT_INPUT: u8 = 2;
/// Exit code when the file parsed but no complete observation survived.
pub const EXIT_EMPTY: u8 = 3;
/// Exit code for terminal/runtime failures.
pub const EXIT_RUNTIME: u8 = 4;

/// The one error type that reaches `main`.
///
/// Carries the process exit code alongside a human-readable message.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures while loading the CO2 record. All of them are fatal to startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to open CO2 data file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File ended inside the {expected}-row preamble (only {found} rows present).")]
    TruncatedPreamble { expected: usize, found: usize },

    #[error("Failed to read CSV header: {0}")]
    Header(String),

    #[error("Schema mismatch on line {line}: expected {expected} columns, found {found}.")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No complete observations remain after dropping rows with missing values.")]
    Empty,
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        let exit_code = match err {
            LoadError::Empty => EXIT_EMPTY,
            _ => EXIT_INPUT,
        };
        AppError::new(exit_code, err.to_string())
    }
}
