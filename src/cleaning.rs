//! Cleaning stages.
//!
//! Each submodule holds one concern as plain functions over a polars
//! `DataFrame`, mostly built from lazy expressions, plus a small struct
//! implementing [`Stage`](crate::pipeline::Stage) so the pipeline can
//! sequence it.
//!
//! | Module | Does |
//! |---|---|
//! | [`classify`] | single value to `Number` / `Float` / `Datetime` / `Object` |
//! | [`columns`] | trims column names, rejects collisions |
//! | [`duplicates`] | finds and drops repeated rows and columns |
//! | [`nulls`] | rectangular view of missing values |
//! | [`coerce`] | retypes each column from its cells' classifications |
//! | [`phone`] | normalizes or rejects phone numbers |
//! | [`trim`] | trims text cells, blanks empty and null-like ones |
//! | [`prune`] | drops empty columns, reports empty rows |
//! | [`impute`] | fills holes with a sentinel or a trailing mean |

pub mod classify;
pub mod coerce;
pub mod columns;
pub mod duplicates;
pub mod impute;
pub mod nulls;
pub mod phone;
pub mod prune;
pub mod trim;

pub use classify::classify;
pub use coerce::{CoerceTypes, cast_expr, coerce_types, infer_column_type};
pub use columns::{NormalizeColumnNames, normalize_column_names};
pub use duplicates::{
    RemoveDuplicateColumns, RemoveDuplicateRows, find_duplicate_columns, find_duplicate_rows,
    remove_duplicate_columns, remove_duplicate_rows,
};
pub use impute::{ImputeMissing, trailing_mean};
pub use nulls::{LocateNulls, locate_nulls, null_columns, null_rows};
pub use phone::{ValidatePhoneNumbers, validate_phone};
pub use prune::{PruneEmpty, empty_columns, empty_rows, prune_empty};
pub use trim::{TrimWhitespace, trim_expr, trim_whitespace};

#[cfg(test)]
mod tests;
