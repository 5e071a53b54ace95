//! Per-stage change reports.
//!
//! Every cleaning stage returns a [`ChangeReport`] next to the dataset it
//! produced. The report is the side channel a presentation layer reads
//! ("3 duplicate rows removed", the null view, ...); it never feeds back
//! into the data itself.

use polars::prelude::DataFrame;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeReport {
    /// Stage that produced this report
    pub stage: String,

    /// Row positions flagged by the stage, relative to the stage's input
    pub flagged_rows: Vec<usize>,

    /// Names of the columns flagged by the stage
    pub flagged_columns: Vec<String>,

    pub affected_row_count: usize,
    pub affected_column_count: usize,

    pub rows_removed: usize,
    pub columns_removed: usize,

    /// Cells whose value was rewritten (trimmed, cast to null, imputed, ...)
    pub cells_changed: usize,

    /// Anomalies absorbed by the stage
    pub warnings: Vec<String>,

    /// The stage's precondition did not hold and it changed nothing
    pub skipped: bool,

    /// Diagnostic sub-table (duplicate rows, null view, ...)
    #[serde(skip)]
    pub preview: Option<DataFrame>,
}

impl ChangeReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            ..Default::default()
        }
    }

    pub fn skipped(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            skipped: true,
            warnings: vec![reason.into()],
            ..Default::default()
        }
    }

    /// Records flagged rows and keeps `affected_row_count` in sync.
    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.affected_row_count = rows.len();
        self.flagged_rows = rows;
        self
    }

    /// Records flagged columns and keeps `affected_column_count` in sync.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.affected_column_count = columns.len();
        self.flagged_columns = columns;
        self
    }

    pub fn with_preview(mut self, preview: DataFrame) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(stage = %self.stage, "{message}");
        self.warnings.push(message);
    }

    /// Whether the stage touched anything at all.
    pub fn is_clean(&self) -> bool {
        self.affected_row_count == 0
            && self.affected_column_count == 0
            && self.rows_removed == 0
            && self.columns_removed == 0
            && self.cells_changed == 0
    }

    /// One-line, human-readable account of the stage.
    pub fn summary(&self) -> String {
        if self.skipped {
            return format!("{}: skipped ({})", self.stage, self.warnings.join("; "));
        }
        let mut line = format!(
            "{}: rows affected: {}, columns affected: {}",
            self.stage, self.affected_row_count, self.affected_column_count
        );
        if self.rows_removed > 0 || self.columns_removed > 0 {
            line.push_str(&format!(
                ", removed {} row(s) and {} column(s)",
                self.rows_removed, self.columns_removed
            ));
        }
        if self.cells_changed > 0 {
            line.push_str(&format!(", {} cell(s) changed", self.cells_changed));
        }
        if !self.warnings.is_empty() {
            line.push_str(&format!(", {} warning(s)", self.warnings.len()));
        }
        line
    }
}
