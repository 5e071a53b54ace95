use super::classify::classify;
use crate::dataset::{DATE_FORMAT, TypeTag, kind, positions, render};
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;
use std::collections::BTreeSet;

pub const STAGE: &str = "coerce_types";

/// What one value votes the whole column should become.
///
/// A `Number` or `Datetime` value votes for its own type. Any other value,
/// including a missing one, votes `Float` if the column *name* reads as a
/// float and `Object` otherwise.
pub fn cell_vote(name_kind: TypeTag, value: Option<&str>) -> TypeTag {
    if let Some(text) = value {
        match classify(text) {
            kind @ (TypeTag::Number | TypeTag::Datetime) => return kind,
            TypeTag::Float | TypeTag::Object => {}
        }
    }
    if name_kind == TypeTag::Float {
        TypeTag::Float
    } else {
        TypeTag::Object
    }
}

/// Column-wide target type: the vote of the last value in row order.
///
/// Mixed columns are decided by whichever value happens to come last; there
/// is no majority vote. `None` for a column without rows.
pub fn infer_column_type(column: &Column) -> Option<TypeTag> {
    let last = column.len().checked_sub(1)?;
    let value = column.get(last).ok().and_then(|v| render(&v));
    Some(cell_vote(classify(column.name()), value.as_deref()))
}

/// Expression casting column `name` to `target`.
///
/// Casts are non-strict: a value that cannot take the new type becomes
/// missing. Integral float text such as `"4.0"` is accepted as a `Number`;
/// dates must be exactly `YYYY-MM-DD`.
pub fn cast_expr(name: &str, target: TypeTag) -> Expr {
    let text = col(name).cast(DataType::String);
    let stripped = text.clone().str().strip_chars(lit(NULL));

    let cast = match target {
        TypeTag::Object => text,
        TypeTag::Float => stripped.cast(DataType::Float64),
        TypeTag::Number => {
            let float = stripped.clone().cast(DataType::Float64);
            let truncated = float.clone().cast(DataType::Int64);
            let integral = truncated.clone().cast(DataType::Float64).eq(float);
            stripped.cast(DataType::Int64).fill_null(
                when(integral)
                    .then(truncated)
                    .otherwise(lit(NULL).cast(DataType::Int64)),
            )
        }
        TypeTag::Datetime => {
            let date = stripped.clone().str().to_date(StrptimeOptions {
                format: Some(DATE_FORMAT.into()),
                strict: false,
                exact: true,
                cache: true,
            });
            when(stripped.str().len_bytes().eq(lit(10u32)))
                .then(date)
                .otherwise(lit(NULL).cast(DataType::Date))
        }
    };
    cast.alias(name)
}

/// Retypes every column to its inferred type.
///
/// Values that cannot take the new type become missing; they are counted in
/// `cells_changed` and warned about per column, never raised.
///
/// # Errors
///
/// Returns an error if the casts cannot be evaluated.
pub fn coerce_types(df: DataFrame) -> Result<(DataFrame, ChangeReport)> {
    let targets: Vec<Option<TypeTag>> = df.get_columns().iter().map(infer_column_type).collect();
    let exprs: Vec<Expr> = df
        .get_columns()
        .iter()
        .zip(&targets)
        .map(|(column, target)| match target {
            Some(target) => cast_expr(column.name(), *target),
            None => col(column.name().clone()),
        })
        .collect();
    let coerced = df.clone().lazy().select(exprs).collect()?;

    let mut report = ChangeReport::new(STAGE);
    let mut retyped = Vec::new();
    let mut lost_rows = BTreeSet::new();

    for (before, after) in df.get_columns().iter().zip(coerced.get_columns()) {
        let lost = positions(&(&before.is_not_null() & &after.is_null()));
        let (from, to) = (kind(before), kind(after));
        if before.dtype() != after.dtype() {
            tracing::debug!(column = %before.name(), %from, %to, "retyped");
            retyped.push(before.name().to_string());
        }
        if !lost.is_empty() {
            report.cells_changed += lost.len();
            report.warn(format!(
                "column '{}': {} value(s) could not be read as {to} and were set to missing",
                before.name(),
                lost.len()
            ));
            lost_rows.extend(lost);
        }
    }

    report = report
        .with_columns(retyped)
        .with_rows(lost_rows.into_iter().collect());
    Ok((coerced, report))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CoerceTypes;

impl Stage for CoerceTypes {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn description(&self) -> String {
        "Infer a type per column and cast its values".to_owned()
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(coerce_types(dataset)?.into())
    }
}
