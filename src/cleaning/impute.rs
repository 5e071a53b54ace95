use crate::config::CleanerSettings;
use crate::dataset::{TypeTag, kind, positions};
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;
use std::collections::BTreeSet;

pub const STAGE: &str = "impute_missing";

/// Trailing-window mean of column `name` at every row.
///
/// Row `i` averages the present values among rows `i + 1 - window ..= i`
/// (clamped at the start), so nothing is ever read from a later row. A
/// window with no present value yields null.
pub fn trailing_mean(name: &str, window: usize) -> Expr {
    col(name)
        .cast(DataType::Float64)
        .rolling_mean(RollingOptionsFixedWindow {
            window_size: window.max(1),
            min_periods: 1,
            ..Default::default()
        })
}

/// Outcome of imputing one column: filled rows and rows left missing.
#[derive(Debug, Default)]
struct Filled {
    rows: Vec<usize>,
    unfilled: usize,
}

/// Evaluates `expr` against `df` as a single series named `name`.
fn evaluate(df: &DataFrame, expr: Expr, name: &str) -> Result<Series> {
    let out = df.clone().lazy().select([expr.alias(name)]).collect()?;
    Ok(out.column(name)?.as_materialized_series().clone())
}

fn impute_text(df: &mut DataFrame, name: &str, sentinel: &str) -> Result<Filled> {
    let filled = Filled {
        rows: positions(&df.column(name)?.is_null()),
        unfilled: 0,
    };
    if !filled.rows.is_empty() {
        let imputed = evaluate(df, col(name).fill_null(lit(sentinel)), name)?;
        df.with_column(imputed)?;
    }
    Ok(filled)
}

fn impute_numeric(df: &mut DataFrame, name: &str, window: usize) -> Result<Filled> {
    let column = df.column(name)?;
    let was_int = kind(column) == TypeTag::Number;
    let values = column.cast(&DataType::Float64)?;
    let means = evaluate(df, trailing_mean(name, window), name)?;

    let mut filled = Filled::default();
    let mut fractional = false;
    for (row, (value, mean)) in values
        .as_materialized_series()
        .f64()?
        .into_iter()
        .zip(means.f64()?)
        .enumerate()
    {
        match (value, mean) {
            (Some(_), _) => {}
            (None, Some(mean)) => {
                fractional |= mean.fract() != 0.0;
                filled.rows.push(row);
            }
            (None, None) => filled.unfilled += 1,
        }
    }

    let target = if was_int && !fractional {
        DataType::Int64
    } else {
        DataType::Float64
    };
    let imputed = col(name)
        .cast(DataType::Float64)
        .fill_null(trailing_mean(name, window))
        .cast(target);
    let imputed = evaluate(df, imputed, name)?;
    df.with_column(imputed)?;
    Ok(filled)
}

#[derive(Debug, Clone)]
pub struct ImputeMissing {
    pub window: usize,
    pub missing_text: String,
}

impl Default for ImputeMissing {
    fn default() -> Self {
        Self::from_settings(&CleanerSettings::default())
    }
}

impl ImputeMissing {
    pub fn from_settings(settings: &CleanerSettings) -> Self {
        Self {
            window: settings.rolling_window,
            missing_text: settings.missing_text.clone(),
        }
    }

    /// Fills holes: text columns get the sentinel, numeric columns the
    /// trailing mean of the values present before imputation. A `Number`
    /// column becomes `Float` when one of its fills is fractional. Date
    /// columns are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if a fill cannot be evaluated.
    pub fn impute(&self, mut df: DataFrame) -> Result<(DataFrame, ChangeReport)> {
        let mut report = ChangeReport::new(STAGE);
        let mut columns = Vec::new();
        let mut rows = BTreeSet::new();

        let plan: Vec<(String, TypeTag)> = df
            .get_columns()
            .iter()
            .filter(|c| c.null_count() > 0)
            .map(|c| (c.name().to_string(), kind(c)))
            .collect();

        for (name, tag) in plan {
            let filled = match tag {
                TypeTag::Object => impute_text(&mut df, &name, &self.missing_text)?,
                TypeTag::Number | TypeTag::Float => impute_numeric(&mut df, &name, self.window)?,
                TypeTag::Datetime => continue,
            };
            if !filled.rows.is_empty() {
                report.cells_changed += filled.rows.len();
                rows.extend(filled.rows);
                columns.push(name.clone());
            }
            if filled.unfilled > 0 {
                report.warn(format!(
                    "column '{name}': {} value(s) left missing, no earlier value within {} rows",
                    filled.unfilled, self.window
                ));
            }
        }

        report = report
            .with_columns(columns)
            .with_rows(rows.into_iter().collect());
        Ok((df, report))
    }
}

impl Stage for ImputeMissing {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn description(&self) -> String {
        format!(
            "Fill missing text with '{}' and missing numbers with a {}-row trailing mean",
            self.missing_text, self.window
        )
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(self.impute(dataset)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn means(values: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>> {
        let df = DataFrame::new(vec![Column::from(Series::new("v".into(), values))])?;
        let out = evaluate(&df, trailing_mean("v", window), "v")?;
        Ok(out.f64()?.into_iter().collect())
    }

    #[test]
    fn test_trailing_mean_clamps_at_start() -> Result<()> {
        let got = means(&[Some(1.0), Some(3.0), Some(5.0), Some(7.0)], 2)?;
        assert_eq!(got, vec![Some(1.0), Some(2.0), Some(4.0), Some(6.0)]);
        Ok(())
    }

    #[test]
    fn test_trailing_mean_skips_missing() -> Result<()> {
        let got = means(&[None, Some(4.0), None, None], 10)?;
        assert_eq!(got, vec![None, Some(4.0), Some(4.0), Some(4.0)]);
        Ok(())
    }

    #[test]
    fn test_window_drops_old_values() -> Result<()> {
        let got = means(&[Some(100.0), None, None], 2)?;
        assert_eq!(got.last().copied().flatten(), None);
        Ok(())
    }
}
