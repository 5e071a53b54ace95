use super::*;

#[test]
fn test_duplicate_rows_reported_in_full_first_kept() -> Result<()> {
    let ds = table(
        &["id", "name"],
        &[
            &[Some("1"), Some("a")],
            &[Some("2"), Some("b")],
            &[Some("1"), Some("a")],
            &[Some("3"), Some("c")],
            &[Some("1"), Some("a")],
        ],
    )?;
    assert_eq!(find_duplicate_rows(&ds)?, vec![0, 2, 4]);

    let (ds, report) = remove_duplicate_rows(ds)?;
    assert_eq!(ds.height(), 3);
    assert_eq!(texts(&ds, "id"), vec![text("1"), text("2"), text("3")]);
    assert_eq!(report.flagged_rows, vec![0, 2, 4]);
    assert_eq!(report.affected_row_count, 3);
    assert_eq!(report.rows_removed, 2);
    assert_eq!(report.preview.as_ref().map(DataFrame::height), Some(3));
    Ok(())
}

#[test]
fn test_missing_cells_compare_equal() -> Result<()> {
    let ds = table(&["a", "b"], &[&[Some("x"), None], &[Some("x"), None]])?;
    let (ds, report) = remove_duplicate_rows(ds)?;
    assert_eq!(ds.height(), 1);
    assert_eq!(report.rows_removed, 1);
    Ok(())
}

#[test]
fn test_distinct_rows_untouched() -> Result<()> {
    let ds = table(&["a"], &[&[Some("1")], &[Some("2")]])?;
    let (out, report) = remove_duplicate_rows(ds.clone())?;
    assert!(out.equals_missing(&ds));
    assert!(report.is_clean());
    assert!(report.preview.is_none());
    Ok(())
}

#[test]
fn test_duplicate_columns_ignore_names() -> Result<()> {
    let ds = table(
        &["A", "B", "C"],
        &[&[Some("1"), Some("1"), Some("1")], &[Some("2"), Some("2"), Some("3")]],
    )?;
    assert_eq!(find_duplicate_columns(&ds), vec![0, 1]);

    let (ds, report) = remove_duplicate_columns(ds)?;
    assert_eq!(column_names(&ds), vec!["A", "C"]);
    assert_eq!(report.flagged_columns, vec!["A", "B"]);
    assert_eq!(report.columns_removed, 1);
    assert_eq!(report.affected_row_count, 2);
    assert_eq!(report.preview.as_ref().map(DataFrame::width), Some(2));
    Ok(())
}

#[test]
fn test_dedup_is_idempotent() -> Result<()> {
    let ds = table(&["a", "b"], &[&[Some("1"), Some("1")], &[Some("1"), Some("1")]])?;
    let (once, _) = remove_duplicate_columns(remove_duplicate_rows(ds)?.0)?;
    let (twice, report) = remove_duplicate_columns(remove_duplicate_rows(once.clone())?.0)?;
    assert!(once.equals_missing(&twice));
    assert_eq!(report.columns_removed, 0);
    Ok(())
}
