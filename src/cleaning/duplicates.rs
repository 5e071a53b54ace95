use crate::dataset::positions;
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;

pub const ROW_STAGE: &str = "duplicate_rows";
pub const COLUMN_STAGE: &str = "duplicate_columns";

/// Every row identical (all columns equal, missing equal to missing) to at
/// least one other row.
///
/// All instances are returned, not only the repeats.
///
/// # Errors
///
/// Returns an error if polars cannot hash the rows.
pub fn find_duplicate_rows(df: &DataFrame) -> Result<Vec<usize>> {
    if df.width() == 0 {
        return Ok(Vec::new());
    }
    Ok(positions(&df.is_duplicated()?))
}

/// Groups columns by their values, ignoring names. Returns every member of
/// a group of two or more, plus every member that is not its group's first.
fn group_duplicate_columns(df: &DataFrame) -> (Vec<usize>, Vec<usize>) {
    let columns = df.get_columns();
    let first_of: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            columns
                .iter()
                .take(idx)
                .position(|earlier| {
                    earlier
                        .as_materialized_series()
                        .equals_missing(column.as_materialized_series())
                })
                .unwrap_or(idx)
        })
        .collect();

    let mut all = Vec::new();
    let mut extras = Vec::new();
    for (idx, &first) in first_of.iter().enumerate() {
        if first != idx {
            extras.push(idx);
            all.push(idx);
        } else if first_of.iter().skip(idx + 1).any(|&f| f == idx) {
            all.push(idx);
        }
    }
    (all, extras)
}

/// Every column whose values equal another column's, ignoring names.
pub fn find_duplicate_columns(df: &DataFrame) -> Vec<usize> {
    group_duplicate_columns(df).0
}

/// Drops repeated rows, keeping the first of each group in place.
///
/// # Errors
///
/// Returns an error if polars cannot hash or filter the rows.
pub fn remove_duplicate_rows(df: DataFrame) -> Result<(DataFrame, ChangeReport)> {
    if df.width() == 0 {
        return Ok((df, ChangeReport::new(ROW_STAGE)));
    }
    let mask = df.is_duplicated()?;
    let deduped = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = df.height() - deduped.height();

    let mut report = ChangeReport::new(ROW_STAGE).with_rows(positions(&mask));
    if removed > 0 {
        report = report.with_preview(df.filter(&mask)?);
    }
    report.rows_removed = removed;
    tracing::debug!(
        flagged = report.affected_row_count,
        removed,
        "duplicate rows"
    );
    Ok((deduped, report))
}

/// Drops repeated columns, keeping the first of each group in place.
///
/// # Errors
///
/// Returns an error if the preview cannot be selected.
pub fn remove_duplicate_columns(df: DataFrame) -> Result<(DataFrame, ChangeReport)> {
    let (all, extras) = group_duplicate_columns(&df);
    let name_at = |idx: &usize| df.get_columns().get(*idx).map(|c| c.name().clone());
    let flagged: Vec<PlSmallStr> = all.iter().filter_map(name_at).collect();
    let dropped: Vec<PlSmallStr> = extras.iter().filter_map(name_at).collect();

    let mut report = ChangeReport::new(COLUMN_STAGE)
        .with_columns(flagged.iter().map(ToString::to_string).collect());
    if !dropped.is_empty() {
        report.affected_row_count = df.height();
        report = report.with_preview(df.select(flagged)?);
    }
    report.columns_removed = dropped.len();
    Ok((df.drop_many(dropped), report))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoveDuplicateRows;

impl Stage for RemoveDuplicateRows {
    fn name(&self) -> &'static str {
        ROW_STAGE
    }

    fn description(&self) -> String {
        "Report identical rows and keep only the first of each".to_owned()
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(remove_duplicate_rows(dataset)?.into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoveDuplicateColumns;

impl Stage for RemoveDuplicateColumns {
    fn name(&self) -> &'static str {
        COLUMN_STAGE
    }

    fn description(&self) -> String {
        "Report columns with identical values and keep only the first of each".to_owned()
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(remove_duplicate_columns(dataset)?.into())
    }
}
