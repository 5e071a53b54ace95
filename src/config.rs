//! Cleaner settings, stored as JSON.
//!
//! Every field has a default so a partial file (or none at all) is valid.
//! The standard location is `<config dir>/tidysheet/config.json`:
//!
//! - Linux: `~/.config/tidysheet/config.json`
//! - macOS: `~/Library/Application Support/tidysheet/config.json`
//! - Windows: `%APPDATA%/tidysheet/config.json`

use crate::error::{CleanError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CleanerSettings {
    /// Column holding phone numbers; matched exactly
    pub phone_column: String,
    /// Digits a valid phone number must have once non-digits are stripped
    pub phone_digits: usize,
    /// Written in place of a missing or invalid phone number
    pub missing_contact: String,
    /// Written in place of missing text values
    pub missing_text: String,
    /// Trailing window length for mean imputation (rows, current included)
    pub rolling_window: usize,
    /// Raw field values treated as missing on ingestion
    pub null_tokens: Vec<String>,
    /// Worksheet name used by the spreadsheet export
    pub sheet_name: String,
    pub pdf: PdfSettings,
}

impl Default for CleanerSettings {
    fn default() -> Self {
        Self {
            phone_column: "Phone Number".to_owned(),
            phone_digits: 10,
            missing_contact: "No Contact".to_owned(),
            missing_text: "No information".to_owned(),
            rolling_window: 10,
            null_tokens: [
                "", "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "None", "#N/A", "<NA>",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            sheet_name: "Sheet1".to_owned(),
            pdf: PdfSettings::default(),
        }
    }
}

impl CleanerSettings {
    pub fn is_null_token(&self, raw: &str) -> bool {
        self.null_tokens.iter().any(|t| t == raw)
    }
}

/// Layout of the paginated document export. Units are PDF points.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PdfSettings {
    pub font_size: f32,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
}

impl Default for PdfSettings {
    fn default() -> Self {
        // US Letter, 8.5 x 11 in
        Self {
            font_size: 10.0,
            page_width: 612.0,
            page_height: 792.0,
            margin: 54.0,
        }
    }
}

impl PdfSettings {
    pub fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }

    /// Text lines that fit between the top and bottom margins.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height - 2.0 * self.margin;
        let lines = (usable / self.line_height()).floor();
        if lines.is_finite() && lines >= 2.0 {
            lines as usize
        } else {
            2
        }
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tidysheet").join("config.json"))
}

/// Loads settings from `path`, or from the standard location when `None`.
///
/// An explicit path must exist and parse. The standard location is optional:
/// if it is missing, defaults are returned.
///
/// # Errors
///
/// Returns [`CleanError::Config`] if an explicit file is missing, or if any
/// file that is read fails to parse.
pub fn load_settings(path: Option<&Path>) -> Result<CleanerSettings> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CleanError::Config(format!(
                    "settings file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => match get_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                tracing::debug!("No settings file found, using defaults");
                return Ok(CleanerSettings::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    let settings = serde_json::from_str(&content)
        .map_err(|e| CleanError::Config(format!("{}: {e}", path.display())))?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Writes settings as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_settings(settings: &CleanerSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}
