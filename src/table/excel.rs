//! Excel reader (first worksheet only)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;

use super::column::Table;
use super::errors::{TableError, TableResult};
use super::infer::{infer_column, unique_headers, RawCell};
use super::value::format_float;

const FORMAT: &str = "Excel";

/// Reads the first worksheet of an `.xlsx`/`.xls` workbook.
///
/// The first row is the header; the remaining rows are data.
pub fn read_excel(path: &Path) -> TableResult<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TableError::read(FORMAT, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::read(FORMAT, "workbook has no worksheets"))?
        .map_err(|e| TableError::read(FORMAT, e))?;
    table_from_range(&range)
}

pub(crate) fn table_from_range(range: &Range<Data>) -> TableResult<Table> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| TableError::read(FORMAT, "No columns to parse from file"))?;

    let names = unique_headers(header.iter().map(header_text));
    let mut cells: Vec<Vec<RawCell>> = vec![Vec::new(); names.len()];

    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).map(raw_cell).unwrap_or(RawCell::Empty));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, column_cells)| infer_column(name, column_cells))
        .collect();
    Table::new(columns)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Float(v) => format_float(*v),
        other => other.to_string(),
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::Int(v) => RawCell::Int(*v),
        Data::Float(v) => RawCell::Float(*v),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::String(s) => RawCell::from_text(s),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => RawCell::DateTime(value),
            None => RawCell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(RawCell::DateTime)
            .unwrap_or_else(|_| RawCell::from_text(s)),
        Data::DurationIso(s) => RawCell::from_text(s),
    }
}
