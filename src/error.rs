//! Centralized error handling for tidysheet.
//!
//! Only failures that make a whole run meaningless are errors: the input
//! could not be read into a [`DataFrame`](polars::prelude::DataFrame), the
//! dataset is structurally broken (ragged or empty), or an output could not
//! be written. Per-cell anomalies (a value that will not cast, a missing
//! optional column) are absorbed by the cleaning stages and surface in their
//! [`ChangeReport`](crate::report::ChangeReport) instead.
//!
//! ```
//! use tidysheet::error::CleanError;
//!
//! fn describe(err: &CleanError) -> &'static str {
//!     match err {
//!         CleanError::Structural(_) => "the table shape is broken",
//!         CleanError::UnsupportedFormat(_) => "unknown file type",
//!         _ => "something else went wrong",
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any result whose error
//! converts into [`CleanError`]:
//!
//! ```no_run
//! use tidysheet::error::ResultExt as _;
//!
//! fn load() -> tidysheet::error::Result<String> {
//!     std::fs::read_to_string("data.csv").context("Failed to load dataset")
//! }
//! ```

use thiserror::Error;

/// Main error type for tidysheet operations.
#[derive(Debug, Error)]
pub enum CleanError {
    /// I/O errors (reading input, writing exports, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text parsing or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Dataframe operation failed
    #[error("Data processing error: {0}")]
    DataProcessing(#[from] polars::error::PolarsError),

    /// Spreadsheet reading or writing failed
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Paginated document rendering failed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// JSON (de)serialization of reports or settings failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ragged columns, an empty dataset, or any other shape defect
    #[error("Structural error: {0}")]
    Structural(String),

    /// Input or output path has an extension we cannot handle
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Settings file missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<calamine::XlsxError> for CleanError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CleanError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<lopdf::Error> for CleanError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf(err.to_string())
    }
}

/// Result type alias for tidysheet operations.
pub type Result<T> = std::result::Result<T, CleanError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CleanError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: CleanError = e.into();
            CleanError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: CleanError = e.into();
            CleanError::Other(format!("{}: {}", f(), err))
        })
    }
}
