#![expect(clippy::unwrap_used)]
use super::*;
use crate::dataset::{TypeTag, column_names, from_rows, kind, rendered};
use anyhow::Result;
use polars::prelude::*;

mod duplicates;

/// Builds an all-text dataset; `None` is a missing cell.
fn table(headers: &[&str], rows: &[&[Option<&str>]]) -> Result<DataFrame> {
    let rows = rows
        .iter()
        .map(|r| r.iter().map(|f| f.map(str::to_owned)).collect::<Vec<_>>());
    Ok(from_rows(headers, rows)?)
}

fn texts(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    rendered(df.column(name).unwrap())
}

fn text(s: &str) -> Option<String> {
    Some(s.to_owned())
}

fn ints(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    let column = df.column(name).unwrap();
    column
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    let column = df.column(name).unwrap();
    column
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn tag(df: &DataFrame, name: &str) -> TypeTag {
    kind(df.column(name).unwrap())
}

#[test]
fn test_column_names_are_trimmed() -> Result<()> {
    let ds = table(&[" Name ", "Age\t"], &[&[Some("a"), Some("1")]])?;
    let (ds, report) = normalize_column_names(ds)?;
    assert_eq!(column_names(&ds), vec!["Name", "Age"]);
    assert_eq!(report.flagged_columns, vec!["Name", "Age"]);
    assert!(report.warnings.is_empty());
    Ok(())
}

#[test]
fn test_column_name_collision_is_rejected() -> Result<()> {
    let ds = table(&["id", " id"], &[&[Some("1"), Some("2")]])?;
    let result = normalize_column_names(ds);
    assert!(matches!(
        result,
        Err(crate::error::CleanError::Structural(msg)) if msg.contains("id")
    ));
    Ok(())
}

#[test]
fn test_clean_names_untouched() -> Result<()> {
    let ds = table(&["a", "b"], &[&[Some("1"), Some("2")]])?;
    let (_, report) = normalize_column_names(ds)?;
    assert!(report.is_clean());
    Ok(())
}

#[test]
fn test_trim_leaves_typed_columns_alone() -> Result<()> {
    let ds = df! {
        "name" => [Some("  Alice "), Some("Bob"), None],
        "code" => [5i64, 6, 7],
    }?;
    let tokens = crate::config::CleanerSettings::default().null_tokens;
    let (ds, report) = trim_whitespace(ds, &tokens)?;

    assert_eq!(texts(&ds, "name"), vec![text("Alice"), text("Bob"), None]);
    assert_eq!(ints(&ds, "code"), vec![Some(5), Some(6), Some(7)]);
    assert_eq!(report.cells_changed, 1);
    assert_eq!(report.flagged_rows, vec![0]);
    assert_eq!(report.flagged_columns, vec!["name"]);
    Ok(())
}

#[test]
fn test_trim_blanks_empty_and_null_like_values() -> Result<()> {
    let ds = table(
        &["note"],
        &[&[Some("   ")], &[Some(" NA ")], &[Some(" null")], &[Some(" NAB ")]],
    )?;
    let crate::pipeline::StageOutput { dataset: ds, report } =
        crate::pipeline::Stage::apply(&TrimWhitespace::default(), ds)?;

    assert_eq!(texts(&ds, "note"), vec![None, None, None, text("NAB")]);
    assert_eq!(report.cells_changed, 4);
    assert_eq!(report.flagged_rows, vec![0, 1, 2, 3]);
    Ok(())
}

#[test]
fn test_trim_is_idempotent() -> Result<()> {
    let ds = table(&["t"], &[&[Some(" x ")], &[Some("y")], &[Some(" ")]])?;
    let (once, _) = trim_whitespace(ds, &[])?;
    let (twice, report) = trim_whitespace(once.clone(), &[])?;
    assert!(once.equals_missing(&twice));
    assert!(report.is_clean());
    Ok(())
}

#[test]
fn test_phone_stage_rewrites_column() -> Result<()> {
    let ds = table(
        &["Name", "Phone Number"],
        &[
            &[Some("a"), Some("(555) 123-4567")],
            &[Some("b"), Some("12345")],
            &[Some("c"), None],
        ],
    )?;
    let stage = ValidatePhoneNumbers::default();
    let (ds, report) = stage.validate(ds)?;
    assert_eq!(
        texts(&ds, "Phone Number"),
        vec![text("5551234567"), text("No Contact"), text("No Contact")]
    );
    assert_eq!(report.cells_changed, 3);
    Ok(())
}

#[test]
fn test_phone_stage_skips_without_column() -> Result<()> {
    let ds = table(&["Name"], &[&[Some("a")]])?;
    let (out, report) = ValidatePhoneNumbers::default().validate(ds.clone())?;
    assert!(out.equals_missing(&ds));
    assert_eq!(report.warnings.len(), 1);
    Ok(())
}
