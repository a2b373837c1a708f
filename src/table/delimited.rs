//! CSV and TSV reader

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};

use super::column::Table;
use super::errors::{TableError, TableResult};
use super::infer::{infer_column, unique_headers, RawCell};

/// Reads a delimited text file into a table
pub fn read_delimited(path: &Path, delimiter: u8, format: &'static str) -> TableResult<Table> {
    let bytes = fs::read(path)?;
    let text = decode_text(&bytes);
    parse_delimited(&text, delimiter, format)
}

/// Decodes as UTF-8, falling back to Windows-1252 (a Latin-1 superset).
///
/// The fallback never fails, so encoding alone never aborts a load.
pub(crate) fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

/// Parses delimited text whose first record is the header
pub(crate) fn parse_delimited(
    text: &str,
    delimiter: u8,
    format: &'static str,
) -> TableResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| TableError::read(format, e))?,
        None => return Err(TableError::read(format, "No columns to parse from file")),
    };

    let names = unique_headers(header.iter());
    let mut cells: Vec<Vec<RawCell>> = vec![Vec::new(); names.len()];

    for record in records {
        let record = record.map_err(|e| TableError::read(format, e))?;
        if record.len() > names.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(TableError::read(
                format,
                format!(
                    "Expected {} fields in line {}, saw {}",
                    names.len(),
                    line,
                    record.len()
                ),
            ));
        }
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(record.get(i).map(RawCell::from_text).unwrap_or(RawCell::Empty));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, column_cells)| infer_column(name, column_cells))
        .collect();
    Table::new(columns)
}
