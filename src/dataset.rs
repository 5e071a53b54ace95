//! The table the cleaning pipeline works on.
//!
//! A dataset is a polars [`DataFrame`]: an ordered list of uniquely named
//! columns that always share one height. Cells are addressed only by
//! `(row, column)` position. Every structural operation the stages perform
//! (filtering rows, selecting or dropping columns) keeps surviving rows and
//! columns in their original order.
//!
//! Ingest builds every column as [`DataType::String`]; the column's dtype
//! after coercion is its [`TypeTag`].

use crate::error::{CleanError, Result};
use chrono::{Days, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The single date pattern recognised anywhere in the crate.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inferred structural type of a value or a whole column.
///
/// `Object` is the universal fallback: any value is admissible in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TypeTag {
    Number,
    Float,
    Datetime,
    #[default]
    Object,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Float => "Float",
            Self::Datetime => "Datetime",
            Self::Object => "Object",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Float)
    }

    /// The tag a column of this dtype carries.
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_integer() {
            Self::Number
        } else if dtype.is_float() {
            Self::Float
        } else if dtype.is_temporal() {
            Self::Datetime
        } else {
            Self::Object
        }
    }

    /// The dtype a column is cast to when it takes this tag.
    pub fn dtype(self) -> DataType {
        match self {
            Self::Number => DataType::Int64,
            Self::Float => DataType::Float64,
            Self::Datetime => DataType::Date,
            Self::Object => DataType::String,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn kind(column: &Column) -> TypeTag {
    TypeTag::of(column.dtype())
}

/// Calendar date of a polars `Date` value (days since the Unix epoch).
pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let offset = Days::new(u64::from(days.unsigned_abs()));
    if days >= 0 {
        epoch.checked_add_days(offset)
    } else {
        epoch.checked_sub_days(offset)
    }
}

/// Textual form of one value, `None` when missing.
///
/// Floats keep their decimal point (`34.0`), matching what the CSV writer
/// emits, so a written file reads back as the same text.
pub fn render(value: &AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some((*s).to_owned()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Float64(f) => Some(format!("{f:?}")),
        AnyValue::Float32(f) => Some(format!("{f:?}")),
        AnyValue::Date(days) => Some(match date_from_days(*days) {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => days.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Every value of `column` as text, top to bottom.
pub fn rendered(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|row| column.get(row).ok().and_then(|v| render(&v)))
        .collect()
}

/// The dataset as text, one vector per row.
pub fn text_rows(df: &DataFrame) -> Vec<Vec<Option<String>>> {
    let columns: Vec<Vec<Option<String>>> = df.get_columns().iter().map(rendered).collect();
    (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|c| c.get(row).cloned().flatten())
                .collect()
        })
        .collect()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect()
}

/// No columns or no rows.
pub fn is_empty(df: &DataFrame) -> bool {
    df.width() == 0 || df.height() == 0
}

/// Positions where `mask` is true.
pub fn positions(mask: &BooleanChunked) -> Vec<usize> {
    mask.into_iter()
        .enumerate()
        .filter_map(|(idx, flag)| (flag == Some(true)).then_some(idx))
        .collect()
}

/// Builds an all-text dataset from a header and row-major records.
///
/// `None` fields are missing values.
///
/// # Errors
///
/// Returns [`CleanError::Structural`] if a record's width differs from the
/// header's or a header name is used twice.
pub fn from_rows<S, R>(headers: &[S], rows: R) -> Result<DataFrame>
where
    S: AsRef<str>,
    R: IntoIterator<Item = Vec<Option<String>>>,
{
    let mut seen = HashSet::new();
    if let Some(name) = headers.iter().map(AsRef::as_ref).find(|n| !seen.insert(*n)) {
        return Err(CleanError::Structural(format!(
            "column name '{name}' appears more than once"
        )));
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (row_idx, record) in rows.into_iter().enumerate() {
        if record.len() != headers.len() {
            return Err(CleanError::Structural(format!(
                "row {row_idx} has {} fields, expected {}",
                record.len(),
                headers.len()
            )));
        }
        for (column, field) in values.iter_mut().zip(record) {
            column.push(field);
        }
    }

    let columns = headers
        .iter()
        .zip(values)
        .map(|(name, cells)| Column::from(Series::new(name.as_ref().into(), cells)))
        .collect();
    Ok(DataFrame::new(columns)?)
}
