use crate::dataset::positions;
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;

pub const STAGE: &str = "prune_empty";

/// Rows in which every cell is missing.
pub fn empty_rows(df: &DataFrame) -> Vec<usize> {
    if df.width() == 0 {
        return Vec::new();
    }
    let mask = df.get_columns().iter().fold(
        BooleanChunked::full("empty".into(), true, df.height()),
        |acc, column| &acc & &column.is_null(),
    );
    positions(&mask)
}

/// Columns in which every cell is missing.
pub fn empty_columns(df: &DataFrame) -> Vec<PlSmallStr> {
    df.get_columns()
        .iter()
        .filter(|c| !c.is_empty() && c.null_count() == c.len())
        .map(|c| c.name().clone())
        .collect()
}

/// Drops entirely empty columns.
///
/// Entirely empty rows are found and reported too, but they stay in the
/// dataset: only the column side is applied.
pub fn prune_empty(df: DataFrame) -> (DataFrame, ChangeReport) {
    let rows = empty_rows(&df);
    let columns = empty_columns(&df);

    let mut report = ChangeReport::new(STAGE)
        .with_rows(rows)
        .with_columns(columns.iter().map(ToString::to_string).collect());
    report.columns_removed = columns.len();
    if report.affected_row_count > 0 {
        tracing::debug!(
            rows = report.affected_row_count,
            "fully empty rows found, kept in place"
        );
    }

    (df.drop_many(columns), report)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PruneEmpty;

impl Stage for PruneEmpty {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn description(&self) -> String {
        "Report empty rows and drop empty columns".to_owned()
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(prune_empty(dataset).into())
    }
}
