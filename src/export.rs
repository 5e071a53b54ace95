//! Output sinks for a cleaned [`DataFrame`].
//!
//! Each sink only needs the final frame and its column order:
//!
//! - [`delimited`]: RFC 4180 comma-separated text
//! - [`sheet`]: a single-sheet `.xlsx` workbook
//! - [`document`]: a paginated PDF rendering of the table

pub mod delimited;
pub mod document;
pub mod sheet;

pub use delimited::to_csv;
pub use document::{text_table, to_pdf};
pub use sheet::to_xlsx;

use crate::config::CleanerSettings;
use crate::error::{CleanError, Result, ResultExt as _};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    /// Picks the format from the file extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "pdf" => Ok(Self::Pdf),
            _ => Err(CleanError::UnsupportedFormat(format!(
                "cannot write '{}' (expected .csv, .xlsx or .pdf)",
                path.display()
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }
}

/// Serializes `df` in memory.
///
/// # Errors
///
/// Returns an error if the chosen encoder fails.
pub fn render(df: &DataFrame, format: ExportFormat, settings: &CleanerSettings) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv(df),
        ExportFormat::Xlsx => to_xlsx(df, &settings.sheet_name),
        ExportFormat::Pdf => to_pdf(df, &settings.pdf),
    }
}

/// Writes `df` to `path` in the format its extension names.
///
/// The bytes go to a sibling temporary file first and are then moved into
/// place, so a failed export never leaves a half-written file at `path`.
///
/// # Errors
///
/// Returns an error if the format is unsupported, encoding fails, or the
/// file cannot be written.
pub fn write_file(df: &DataFrame, path: &Path, settings: &CleanerSettings) -> Result<PathBuf> {
    let format = ExportFormat::from_path(path)?;
    let bytes = render(df, format, settings)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension(format!("{}.partial", format.extension()));
    std::fs::write(&temp_path, &bytes)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        std::fs::copy(&temp_path, path)
            .with_context(|| format!("Failed to move file (Rename error: {e})"))?;
        let _ = std::fs::remove_file(&temp_path);
    }

    tracing::info!(
        "Exported {} rows to {} ({} bytes)",
        df.height(),
        path.display(),
        bytes.len()
    );
    Ok(path.to_path_buf())
}
