use crate::error::Result;
use polars::prelude::*;

/// Header row plus one record per row, UTF-8, comma separated, CRLF line
/// endings.
///
/// Fields are quoted only when RFC 4180 requires it; missing values are
/// empty fields and dates are written `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the frame cannot be serialized.
pub fn to_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_style(QuoteStyle::Necessary)
        .with_line_terminator("\r\n".to_owned())
        .with_date_format(Some(crate::dataset::DATE_FORMAT.to_owned()))
        .finish(&mut df.clone())?;
    Ok(buffer)
}
