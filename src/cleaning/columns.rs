use crate::error::{CleanError, Result};
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;
use std::collections::HashMap;

pub const STAGE: &str = "normalize_column_names";

/// Names used by more than one column, in first-appearance order.
pub fn duplicate_names<'a>(names: &[&'a str]) -> Vec<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &name in names {
        *counts.entry(name).or_default() += 1;
    }
    let mut seen: Vec<&'a str> = Vec::new();
    for &name in names {
        if counts.get(name).copied().unwrap_or(0) > 1 && !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// Strips leading and trailing whitespace from every column name.
///
/// # Errors
///
/// Returns [`CleanError::Structural`] if two names are equal once trimmed;
/// which column should keep the name is for the caller to decide.
pub fn normalize_column_names(mut df: DataFrame) -> Result<(DataFrame, ChangeReport)> {
    let original: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    let trimmed: Vec<&str> = original.iter().map(|n| n.trim()).collect();

    let collisions = duplicate_names(&trimmed);
    if !collisions.is_empty() {
        return Err(CleanError::Structural(format!(
            "column names collide once trimmed: {}",
            collisions.join(", ")
        )));
    }

    let renamed: Vec<String> = original
        .iter()
        .zip(&trimmed)
        .filter(|(before, after)| before.len() != after.len())
        .map(|(_, after)| (*after).to_owned())
        .collect();
    if !renamed.is_empty() {
        df.set_column_names(trimmed.iter().copied())?;
        tracing::debug!(columns = renamed.len(), "column names trimmed");
    }

    Ok((df, ChangeReport::new(STAGE).with_columns(renamed)))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeColumnNames;

impl Stage for NormalizeColumnNames {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn description(&self) -> String {
        "Trim whitespace around column names".to_owned()
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(normalize_column_names(dataset)?.into())
    }
}
