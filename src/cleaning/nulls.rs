use crate::dataset::positions;
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;

pub const STAGE: &str = "locate_nulls";

/// Row mask of every row with at least one missing cell.
pub fn null_rows(df: &DataFrame) -> BooleanChunked {
    df.get_columns().iter().fold(
        BooleanChunked::full("nulls".into(), false, df.height()),
        |acc, column| &acc | &column.is_null(),
    )
}

/// Columns with at least one missing cell anywhere.
pub fn null_columns(df: &DataFrame) -> Vec<PlSmallStr> {
    df.get_columns()
        .iter()
        .filter(|c| c.null_count() > 0)
        .map(|c| c.name().clone())
        .collect()
}

/// Rectangular diagnostic view of the holes in `df`.
///
/// The column set is global (every column missing a value somewhere); the
/// row set is local (only rows that have a hole). Read-only.
///
/// # Errors
///
/// Returns an error if polars cannot select or filter the frame.
pub fn locate_nulls(df: &DataFrame) -> Result<DataFrame> {
    let mask = null_rows(df);
    Ok(df.select(null_columns(df))?.filter(&mask)?)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocateNulls;

impl Stage for LocateNulls {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn description(&self) -> String {
        "Report rows and columns with missing values".to_owned()
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        let rows = positions(&null_rows(&dataset));
        let columns = null_columns(&dataset);
        let mut report = ChangeReport::new(STAGE)
            .with_rows(rows.clone())
            .with_columns(columns.iter().map(ToString::to_string).collect());
        if !rows.is_empty() {
            report = report.with_preview(locate_nulls(&dataset)?);
        }
        Ok(StageOutput { dataset, report })
    }
}
