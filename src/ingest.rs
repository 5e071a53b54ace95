//! Reading delimited text and spreadsheets into a polars [`DataFrame`].
//!
//! Everything arrives as text: typing is the pipeline's job. Field values
//! listed in [`CleanerSettings::null_tokens`] become missing. Whitespace is
//! preserved exactly as found so the cleaning stages can see it.
//!
//! Records are read with the `csv` crate rather than the polars reader, which
//! pads short records with nulls; here a record of the wrong width is a
//! structural error. Workbooks are read with `calamine`.

use crate::config::CleanerSettings;
use crate::dataset::from_rows;
use crate::error::{CleanError, Result, ResultExt as _};
use calamine::{Data, DataType as _, Reader, Xlsx};
use csv::{ReaderBuilder, Trim};
use polars::prelude::DataFrame;
use std::io::{Read, Seek};
use std::path::Path;

/// Source formats [`load_dataset`] understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
}

impl InputFormat {
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
            _ => Err(CleanError::UnsupportedFormat(format!(
                "cannot read '{}' (expected .csv or .xlsx)",
                path.display()
            ))),
        }
    }
}

fn to_field(raw: &str, settings: &CleanerSettings) -> Option<String> {
    if settings.is_null_token(raw) {
        None
    } else {
        Some(raw.to_owned())
    }
}

/// Reads comma-separated text with a header row.
///
/// # Errors
///
/// Returns an error if the text is not valid CSV, or
/// [`CleanError::Structural`] if a record's width differs from the header's
/// or a header name repeats.
pub fn read_csv<R: Read>(reader: R, settings: &CleanerSettings) -> Result<DataFrame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::None)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to parse CSV row {}", row_no + 1))?;
        rows.push(record.iter().map(|f| to_field(f, settings)).collect());
    }

    let dataset = from_rows(headers.as_slice(), rows)?;
    tracing::debug!(
        rows = dataset.height(),
        columns = dataset.width(),
        "CSV loaded"
    );
    Ok(dataset)
}

fn spreadsheet_field(cell: &Data, settings: &CleanerSettings) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => date.format(crate::dataset::DATE_FORMAT).to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    };
    to_field(&text, settings)
}

/// Reads the first worksheet of an `.xlsx` workbook; its first row is the
/// header.
///
/// # Errors
///
/// Returns [`CleanError::Spreadsheet`] if the workbook cannot be opened or
/// has no worksheet.
pub fn read_xlsx<RS: Read + Seek>(reader: RS, settings: &CleanerSettings) -> Result<DataFrame> {
    let mut workbook: Xlsx<RS> = Xlsx::new(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CleanError::Spreadsheet("No worksheet found".to_owned()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|c| spreadsheet_field(c, settings).unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };
    let records: Vec<Vec<Option<String>>> = rows
        .map(|row| row.iter().map(|c| spreadsheet_field(c, settings)).collect())
        .collect();

    let dataset = from_rows(headers.as_slice(), records)?;
    tracing::debug!(
        rows = dataset.height(),
        columns = dataset.width(),
        "Workbook loaded"
    );
    Ok(dataset)
}

/// Loads a `.csv` or `.xlsx` file.
///
/// # Errors
///
/// Returns an error if the extension is unsupported, the file cannot be
/// opened, or its contents cannot be parsed into a rectangular dataset.
pub fn load_dataset(path: &Path, settings: &CleanerSettings) -> Result<DataFrame> {
    let format = InputFormat::from_path(path)?;
    tracing::info!("Loading {} as {format:?}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    match format {
        InputFormat::Csv => read_csv(std::io::BufReader::new(file), settings),
        InputFormat::Xlsx => read_xlsx(std::io::BufReader::new(file), settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{column_names, rendered};

    fn values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
        Ok(rendered(df.column(name)?))
    }

    fn text(s: &str) -> Option<String> {
        Some(s.to_owned())
    }

    #[test]
    fn test_null_tokens_and_whitespace() -> Result<()> {
        let text_in = " Name ,Age\n Alice ,NA\nBob,\n";
        let df = read_csv(text_in.as_bytes(), &CleanerSettings::default())?;
        assert_eq!(column_names(&df), vec![" Name ", "Age"]);
        assert_eq!(df.height(), 2);
        assert_eq!(values(&df, " Name ")?, vec![text(" Alice "), text("Bob")]);
        assert_eq!(df.column("Age")?.null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_null_tokens_match_exactly() -> Result<()> {
        let df = read_csv("note\n NA \nNA\n".as_bytes(), &CleanerSettings::default())?;
        assert_eq!(values(&df, "note")?, vec![text(" NA "), None]);
        Ok(())
    }

    #[test]
    fn test_quoted_fields() -> Result<()> {
        let text_in = "a,b\n\"x, y\",\"say \"\"hi\"\"\"\n\"two\nlines\",z\n";
        let df = read_csv(text_in.as_bytes(), &CleanerSettings::default())?;
        assert_eq!(values(&df, "a")?, vec![text("x, y"), text("two\nlines")]);
        assert_eq!(values(&df, "b")?, vec![text("say \"hi\""), text("z")]);
        Ok(())
    }

    #[test]
    fn test_ragged_csv_is_structural() {
        let text_in = "a,b\n1,2\n3\n";
        let result = read_csv(text_in.as_bytes(), &CleanerSettings::default());
        assert!(matches!(result, Err(CleanError::Structural(_))));
    }

    #[test]
    fn test_repeated_header_is_structural() {
        let result = read_csv("id,id\n1,2\n".as_bytes(), &CleanerSettings::default());
        assert!(matches!(result, Err(CleanError::Structural(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.CSV")).ok(), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_path(Path::new("a.xlsx")).ok(), Some(InputFormat::Xlsx));
        assert!(matches!(
            InputFormat::from_path(Path::new("a.parquet")),
            Err(CleanError::UnsupportedFormat(_))
        ));
    }
}
