use crate::dataset::{DATE_FORMAT, date_from_days, render};
use crate::error::{CleanError, Result};
use chrono::Datelike as _;
use polars::prelude::*;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

/// A workbook with one sheet named `sheet_name`: a bold header row, then
/// one row per record.
///
/// Numbers are written as numbers and dates as date cells formatted
/// `yyyy-mm-dd`. Missing values are left blank.
///
/// # Errors
///
/// Returns [`CleanError::Spreadsheet`] if the sheet name is invalid or the
/// dataset exceeds the worksheet limits.
pub fn to_xlsx(df: &DataFrame, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col = u16::try_from(col_idx)
            .map_err(|e| CleanError::Spreadsheet(format!("column {col_idx}: {e}")))?;
        worksheet.write_string_with_format(0, col, column.name().as_str(), &header_format)?;

        for row_idx in 0..column.len() {
            let row = u32::try_from(row_idx + 1)
                .map_err(|e| CleanError::Spreadsheet(format!("row {row_idx}: {e}")))?;
            write_value(worksheet, row, col, &column.get(row_idx)?, &date_format)?;
        }
        worksheet.set_column_width(col, display_width(column.name().len()))?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &AnyValue<'_>,
    date_format: &Format,
) -> Result<()> {
    match value {
        AnyValue::Null => {}
        AnyValue::Int64(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        AnyValue::Float64(f) if f.is_finite() => {
            worksheet.write_number(row, col, *f)?;
        }
        AnyValue::Date(days) => {
            let date = date_from_days(*days);
            let excel_date = date.and_then(|d| {
                let year = u16::try_from(d.year()).ok()?;
                ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8).ok()
            });
            match (excel_date, date) {
                (Some(dt), _) => {
                    worksheet.write_datetime_with_format(row, col, &dt, date_format)?;
                }
                // Outside the range Excel can represent.
                (None, Some(d)) => {
                    worksheet.write_string(row, col, d.format(DATE_FORMAT).to_string())?;
                }
                (None, None) => {
                    worksheet.write_string(row, col, days.to_string())?;
                }
            }
        }
        other => {
            if let Some(text) = render(other) {
                worksheet.write_string(row, col, text)?;
            }
        }
    }
    Ok(())
}

fn display_width(chars: usize) -> f64 {
    (chars.clamp(8, 60) + 2) as f64
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;
    use crate::dataset::from_rows;
    use calamine::{Data, Reader as _, Xlsx, open_workbook_from_rs};
    use std::io::Cursor;

    #[test]
    fn test_typed_cells_survive() -> Result<()> {
        // 2023-01-15 as days since the epoch.
        let dates = Series::new("d".into(), [Some(19372i32), None]).cast(&DataType::Date)?;
        let df = DataFrame::new(vec![
            Column::from(Series::new("n".into(), [Some(42i64), None])),
            Column::from(Series::new("f".into(), [2.5, 1.0])),
            Column::from(dates),
            Column::from(Series::new("t".into(), ["x", "y"])),
        ])?;
        let bytes = to_xlsx(&df, "Cleaned")?;

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Cleaned".to_owned()]);
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<_> = range.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], Data::String("n".to_owned()));
        assert_eq!(rows[1][0], Data::Float(42.0));
        assert_eq!(rows[1][1], Data::Float(2.5));
        assert!(matches!(rows[1][2], Data::DateTime(_)));
        assert_eq!(rows[2][0], Data::Empty);
        assert_eq!(rows[2][3], Data::String("y".to_owned()));
        Ok(())
    }

    #[test]
    fn test_invalid_sheet_name_is_rejected() {
        let df = from_rows(&["a"], vec![vec![Some("1".to_owned())]]).unwrap();
        assert!(matches!(to_xlsx(&df, "bad/name"), Err(CleanError::Spreadsheet(_))));
    }
}
