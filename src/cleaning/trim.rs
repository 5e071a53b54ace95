use crate::config::CleanerSettings;
use crate::dataset::{TypeTag, kind, positions};
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;
use std::collections::BTreeSet;

pub const STAGE: &str = "trim_whitespace";

/// Trimmed text of column `name`. A value that trims to nothing, or to one
/// of `null_tokens`, becomes missing.
pub fn trim_expr(name: &str, null_tokens: &[String]) -> Expr {
    let stripped = col(name).str().strip_chars(lit(NULL));
    let tokens = Series::new("null_tokens".into(), null_tokens);
    when(
        stripped
            .clone()
            .eq(lit(""))
            .or(stripped.clone().is_in(lit(tokens))),
    )
    .then(lit(NULL).cast(DataType::String))
    .otherwise(stripped)
    .alias(name)
}

/// Strips leading and trailing whitespace from the text of every `Object`
/// column. Typed columns are left alone and missing cells stay missing.
///
/// # Errors
///
/// Returns an error if the trim expressions cannot be evaluated.
pub fn trim_whitespace(df: DataFrame, null_tokens: &[String]) -> Result<(DataFrame, ChangeReport)> {
    let exprs: Vec<Expr> = df
        .get_columns()
        .iter()
        .map(|column| match kind(column) {
            TypeTag::Object => trim_expr(column.name(), null_tokens),
            TypeTag::Number | TypeTag::Float | TypeTag::Datetime => col(column.name().clone()),
        })
        .collect();
    let trimmed = df.clone().lazy().select(exprs).collect()?;

    let mut report = ChangeReport::new(STAGE);
    let mut columns = Vec::new();
    let mut rows = BTreeSet::new();
    for (before, after) in df.get_columns().iter().zip(trimmed.get_columns()) {
        let changed = positions(
            &before
                .as_materialized_series()
                .not_equal_missing(after.as_materialized_series())?,
        );
        if !changed.is_empty() {
            columns.push(before.name().to_string());
            report.cells_changed += changed.len();
            rows.extend(changed);
        }
    }

    report = report
        .with_columns(columns)
        .with_rows(rows.into_iter().collect());
    Ok((trimmed, report))
}

#[derive(Debug, Clone)]
pub struct TrimWhitespace {
    pub null_tokens: Vec<String>,
}

impl Default for TrimWhitespace {
    fn default() -> Self {
        Self::from_settings(&CleanerSettings::default())
    }
}

impl TrimWhitespace {
    pub fn from_settings(settings: &CleanerSettings) -> Self {
        Self {
            null_tokens: settings.null_tokens.clone(),
        }
    }
}

impl Stage for TrimWhitespace {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn description(&self) -> String {
        "Trim whitespace around text values, blanking empty and null-like ones".to_owned()
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(trim_whitespace(dataset, &self.null_tokens)?.into())
    }
}
