//! End-to-end tests: load a fixture, clean it, write every output format
//! and read the results back.

#![expect(clippy::unwrap_used)]

use calamine::{Data, Reader as _, Xlsx, open_workbook_from_rs};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tidysheet::config::CleanerSettings;
use tidysheet::dataset::{TypeTag, column_names, from_rows, kind, rendered, text_rows};
use tidysheet::error::CleanError;
use tidysheet::pipeline::{self, PipelineOutcome};
use tidysheet::{export, ingest};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn clean_fixture(name: &str) -> PipelineOutcome {
    let settings = CleanerSettings::default();
    let raw = ingest::load_dataset(&fixture(name), &settings).unwrap();
    pipeline::clean(raw, &settings).unwrap()
}

fn texts(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    rendered(df.column(name).unwrap())
}

fn tag(df: &DataFrame, name: &str) -> TypeTag {
    kind(df.column(name).unwrap())
}

fn row(fields: &[&str]) -> Vec<Option<String>> {
    fields.iter().map(|f| Some((*f).to_owned())).collect()
}

/// Writes the cleaned frame as CSV and reads it back as raw text.
fn csv_roundtrip(df: &DataFrame, settings: &CleanerSettings) -> DataFrame {
    let bytes = export::to_csv(df).unwrap();
    ingest::read_csv(Cursor::new(bytes), settings).unwrap()
}

#[test]
fn test_contacts_end_to_end() {
    let outcome = clean_fixture("contacts.csv");
    let ds = &outcome.dataset;

    assert_eq!(
        column_names(ds),
        vec!["Name", "Age", "Phone Number", "Joined", "Score", "Notes"],
        "names trimmed, empty column dropped"
    );
    assert_eq!(ds.height(), 4, "one duplicate row removed");

    assert_eq!(texts(ds, "Name").first(), Some(&Some("Alice".to_owned())));

    assert_eq!(tag(ds, "Phone Number"), TypeTag::Object);
    assert_eq!(
        texts(ds, "Phone Number"),
        row(&["5551234567", "5559876543", "No Contact", "No Contact"])
    );

    assert_eq!(tag(ds, "Age"), TypeTag::Float, "fractional mean promotes the column");
    let age = ds.column("Age").unwrap().as_materialized_series().f64().unwrap().get(2);
    assert_eq!(age, Some(31.5));

    assert_eq!(tag(ds, "Score"), TypeTag::Number);
    assert_eq!(ds.column("Score").unwrap().dtype(), &DataType::Int64);
    assert_eq!(texts(ds, "Score"), row(&["10", "10", "30", "20"]));

    assert_eq!(tag(ds, "Joined"), TypeTag::Datetime);

    assert_eq!(
        texts(ds, "Notes"),
        row(&["friend", "colleague", "No information", "No information"])
    );
}

#[test]
fn test_contacts_reports() {
    let outcome = clean_fixture("contacts.csv");

    assert_eq!(outcome.reports.len(), 9);
    assert_eq!(outcome.run.rows_before, 5);
    assert_eq!(outcome.run.rows_after, 4);
    assert_eq!(outcome.run.columns_after, 6);

    let dupes = outcome.report("duplicate_rows").unwrap();
    assert_eq!(dupes.flagged_rows, vec![1, 3]);
    assert_eq!(dupes.rows_removed, 1);

    let view = outcome.null_view().unwrap();
    assert_eq!(view.height(), 4);
    assert_eq!(
        column_names(view),
        vec!["Age", "Phone Number", "Score", "Notes", "Unused"]
    );

    let pruned = outcome.report("prune_empty").unwrap();
    assert_eq!(pruned.flagged_columns, vec!["Unused"]);
    assert!(pruned.flagged_rows.is_empty());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["reports"][0]["stage"], "normalize_column_names");
    assert!(json.get("dataset").is_none());
}

#[test]
fn test_missing_phone_column_is_skipped() {
    let outcome = clean_fixture("no_phone.csv");
    let report = outcome.report("phone_numbers").unwrap();
    assert!(report.skipped);
    assert_eq!(outcome.dataset.height(), 2);
    assert_eq!(tag(&outcome.dataset, "Population"), TypeTag::Number);
}

#[test]
fn test_header_only_input_is_rejected() {
    let settings = CleanerSettings::default();
    let raw = ingest::load_dataset(&fixture("header_only.csv"), &settings).unwrap();
    assert_eq!(raw.height(), 0);
    assert!(matches!(
        pipeline::clean(raw, &settings),
        Err(CleanError::Structural(_))
    ));
}

#[test]
fn test_csv_roundtrip() {
    let outcome = clean_fixture("contacts.csv");
    let settings = CleanerSettings::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts_cleaned.csv");

    export::write_file(&outcome.dataset, &path, &settings).unwrap();
    let reloaded = ingest::load_dataset(&path, &settings).unwrap();

    assert_eq!(column_names(&reloaded), column_names(&outcome.dataset));
    assert_eq!(text_rows(&reloaded), text_rows(&outcome.dataset));
}

#[test]
fn test_blank_and_null_like_text_becomes_sentinel() {
    let settings = CleanerSettings::default();
    let raw = ingest::read_csv(Cursor::new("name,note\nAl,  \nBo, NA \nCy,ok\n"), &settings).unwrap();
    let outcome = pipeline::clean(raw, &settings).unwrap();

    let expected = vec![
        row(&["Al", "No information"]),
        row(&["Bo", "No information"]),
        row(&["Cy", "ok"]),
    ];
    assert_eq!(text_rows(&outcome.dataset), expected);
    assert_eq!(text_rows(&csv_roundtrip(&outcome.dataset, &settings)), expected);

    let trim = outcome.report("trim_whitespace").unwrap();
    assert_eq!(trim.flagged_rows, vec![0, 1]);
}

#[test]
fn test_tricky_text_survives_csv_roundtrip() {
    let settings = CleanerSettings::default();
    let outcome = clean_fixture("tricky.csv");
    let ds = &outcome.dataset;

    assert_eq!(column_names(ds), vec!["Name", "City", "Quote", "Note", "Amount"]);
    assert_eq!(
        text_rows(ds),
        vec![
            row(&["Ann", "Portland, OR", "She said \"hi\"", "ok", "12"]),
            row(&["Ben", "Austin, TX", "line one\nline two", "No information", "7"]),
            row(&["Cy", "No information", "plain", "No information", "9"]),
        ]
    );
    assert_eq!(tag(ds, "Amount"), TypeTag::Number);

    let reloaded = csv_roundtrip(ds, &settings);
    assert_eq!(column_names(&reloaded), column_names(ds));
    assert_eq!(text_rows(&reloaded), text_rows(ds));
}

#[test]
fn test_xlsx_export_reads_back() {
    let outcome = clean_fixture("contacts.csv");
    let settings = CleanerSettings::default();
    let bytes = export::to_xlsx(&outcome.dataset, &settings.sheet_name).unwrap();

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_owned()]);
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    assert_eq!(range.height(), 5);
    assert_eq!(range.width(), 6);
    assert_eq!(range.get_value((3, 1)), Some(&Data::Float(31.5)));
    assert_eq!(
        range.get_value((3, 2)),
        Some(&Data::String("No Contact".to_owned()))
    );

    // The workbook is also a valid input.
    let bytes = export::to_xlsx(&outcome.dataset, "Sheet1").unwrap();
    let reread = ingest::read_xlsx(Cursor::new(bytes), &settings).unwrap();
    assert_eq!(column_names(&reread), column_names(&outcome.dataset));
    assert_eq!(
        texts(&reread, "Joined").first(),
        Some(&Some("2023-01-15".to_owned()))
    );
}

#[test]
fn test_pdf_export_paginates() {
    let outcome = clean_fixture("contacts.csv");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.pdf");
    export::write_file(&outcome.dataset, &path, &CleanerSettings::default()).unwrap();

    let doc = lopdf::Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_unsupported_extensions() {
    let settings = CleanerSettings::default();
    assert!(matches!(
        ingest::load_dataset(Path::new("data.parquet"), &settings),
        Err(CleanError::UnsupportedFormat(_))
    ));
    let ds = from_rows(&["a"], vec![vec![Some("1".to_owned())]]).unwrap();
    assert!(matches!(
        export::write_file(&ds, Path::new("out.json"), &settings),
        Err(CleanError::UnsupportedFormat(_))
    ));
}
