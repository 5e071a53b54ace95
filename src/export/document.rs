//! Paginated PDF rendering.
//!
//! The table is laid out as fixed-width text in the built-in Courier face,
//! so no font files are embedded. Columns that do not fit across one page
//! are split into groups printed one after another; every page starts with
//! the header line of its group.

use crate::config::PdfSettings;
use crate::dataset::{kind, rendered};
use crate::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use polars::prelude::*;

/// Courier glyphs are 600/1000 em wide.
const GLYPH_WIDTH_EM: f32 = 0.6;
const COLUMN_GAP: &str = "  ";

/// One column laid out as text.
struct TextColumn {
    name: String,
    cells: Vec<String>,
    width: usize,
    right_align: bool,
}

impl TextColumn {
    fn new(column: &Column) -> Self {
        let name = column.name().to_string();
        let cells: Vec<String> = rendered(column)
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        let width = cells
            .iter()
            .map(|c| c.chars().count())
            .chain(std::iter::once(name.chars().count()))
            .max()
            .unwrap_or(0);
        Self {
            name,
            cells,
            width,
            right_align: kind(column).is_numeric(),
        }
    }

    fn pad(&self, text: &str) -> String {
        let width = self.width;
        if self.right_align {
            format!("{text:>width$}")
        } else {
            format!("{text:<width$}")
        }
    }
}

fn join_line(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(COLUMN_GAP).trim_end().to_owned()
}

/// Renders the selected columns as aligned text lines: the header first,
/// then one line per row. Numeric columns are right-aligned.
pub fn text_table(df: &DataFrame, columns: &[usize]) -> Vec<String> {
    let selected: Vec<TextColumn> = columns
        .iter()
        .filter_map(|&i| df.get_columns().get(i))
        .map(TextColumn::new)
        .collect();

    let mut lines = vec![join_line(selected.iter().map(|c| c.pad(&c.name)))];
    for row in 0..df.height() {
        lines.push(join_line(selected.iter().map(|c| {
            c.pad(c.cells.get(row).map(String::as_str).unwrap_or_default())
        })));
    }
    lines
}

/// Splits column indices into runs whose rendered width fits `max_chars`.
/// A column wider than the page gets a group of its own.
fn column_groups(widths: &[usize], max_chars: usize) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used = 0;

    for (idx, &width) in widths.iter().enumerate() {
        let needed = if current.is_empty() {
            width
        } else {
            used + COLUMN_GAP.len() + width
        };
        if !current.is_empty() && needed > max_chars {
            groups.push(std::mem::take(&mut current));
            used = width;
        } else {
            used = needed;
        }
        current.push(idx);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Courier in the standard encoding only covers ASCII reliably.
fn printable(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Page-sized chunks of lines, each starting with the group's header.
fn paginate(lines: &[String], lines_per_page: usize) -> Vec<Vec<String>> {
    let Some((header, body)) = lines.split_first() else {
        return Vec::new();
    };
    let rows_per_page = lines_per_page.saturating_sub(1).max(1);
    if body.is_empty() {
        return vec![vec![header.clone()]];
    }
    body.chunks(rows_per_page)
        .map(|chunk| {
            std::iter::once(header)
                .chain(chunk)
                .cloned()
                .collect()
        })
        .collect()
}

fn page_content(lines: &[String], settings: &PdfSettings) -> Result<Vec<u8>> {
    let top = settings.page_height - settings.margin - settings.font_size;
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), settings.font_size.into()]),
        Operation::new("TL", vec![settings.line_height().into()]),
        Operation::new("Td", vec![settings.margin.into(), top.into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(printable(line))]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    Ok(Content { operations }.encode()?)
}

/// Renders the dataset as a US-Letter (by default) PDF table.
///
/// # Errors
///
/// Returns [`CleanError::Pdf`](crate::error::CleanError::Pdf) if a page
/// cannot be encoded, or an I/O error if the document cannot be serialized.
pub fn to_pdf(df: &DataFrame, settings: &PdfSettings) -> Result<Vec<u8>> {
    let usable_width = settings.page_width - 2.0 * settings.margin;
    let max_chars = (usable_width / (settings.font_size * GLYPH_WIDTH_EM)).floor().max(1.0) as usize;
    let widths: Vec<usize> = df
        .get_columns()
        .iter()
        .map(|c| TextColumn::new(c).width)
        .collect();

    let mut pages: Vec<Vec<String>> = Vec::new();
    for group in column_groups(&widths, max_chars) {
        let lines = text_table(df, &group);
        pages.extend(paginate(&lines, settings.lines_per_page()));
    }
    if pages.is_empty() {
        pages.push(Vec::new());
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in &pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(lines, settings)?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            settings.page_width.into(),
            settings.page_height.into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    tracing::debug!(pages = pages.len(), bytes = buffer.len(), "PDF rendered");
    Ok(buffer)
}
