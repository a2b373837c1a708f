//! Column type inference for text-based sources (CSV/TSV, Excel).
//!
//! Cells arrive as [`RawCell`]s. A column becomes numeric only when every
//! non-null cell parses as a number; otherwise it stays a string column.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use super::column::{Column, ColumnType};
use super::value::{format_datetime, format_float, Value};

/// Field contents treated as missing
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// An untyped cell as read from the source file
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawCell {
    /// Classifies a text field, mapping null tokens to [`RawCell::Empty`]
    pub(crate) fn from_text(text: &str) -> Self {
        if NULL_TOKENS.contains(&text) {
            RawCell::Empty
        } else {
            RawCell::Text(text.to_string())
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            RawCell::Int(v) => Some(*v),
            RawCell::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(*v as i64),
            RawCell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            RawCell::Int(v) => Some(*v as f64),
            RawCell::Float(v) => Some(*v),
            RawCell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            RawCell::Bool(b) => Some(*b),
            RawCell::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            RawCell::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            RawCell::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            RawCell::Text(s) => Some(s),
            RawCell::Int(v) => Some(v.to_string()),
            RawCell::Float(v) => Some(format_float(v)),
            RawCell::Bool(b) => Some(b.to_string()),
            RawCell::DateTime(dt) => Some(format_datetime(&dt, ' ')),
        }
    }
}

/// Builds a typed column from raw cells.
///
/// Tries, in order: integer, float, boolean, datetime, string.
pub(crate) fn infer_column(name: String, cells: Vec<RawCell>) -> Column {
    let present: Vec<&RawCell> = cells.iter().filter(|c| !c.is_empty()).collect();

    if present.is_empty() {
        let values = vec![Value::Null; cells.len()];
        return Column::new(name, ColumnType::string(), values);
    }

    if present.iter().all(|c| c.as_int().is_some()) {
        let values = typed(&cells, |c| c.as_int().map(Value::Int));
        return Column::new(name, ColumnType::int64(), values);
    }
    if present.iter().all(|c| c.as_float().is_some()) {
        let values = typed(&cells, |c| c.as_float().map(Value::Float));
        return Column::new(name, ColumnType::double(), values);
    }
    if present.iter().all(|c| c.as_bool().is_some()) {
        let values = typed(&cells, |c| c.as_bool().map(Value::Bool));
        return Column::new(name, ColumnType::boolean(), values);
    }
    if present.iter().all(|c| c.as_datetime().is_some()) {
        let values = typed(&cells, |c| c.as_datetime().map(Value::DateTime));
        return Column::new(name, ColumnType::timestamp(), values);
    }

    let values = cells
        .into_iter()
        .map(|c| c.into_text().map(Value::Str).unwrap_or(Value::Null))
        .collect();
    Column::new(name, ColumnType::string(), values)
}

fn typed(cells: &[RawCell], convert: impl Fn(&RawCell) -> Option<Value>) -> Vec<Value> {
    cells
        .iter()
        .map(|c| convert(c).unwrap_or(Value::Null))
        .collect()
}

/// Turns header cells into unique column names.
///
/// Blank headers become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes.
pub(crate) fn unique_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (i, header) in headers.into_iter().enumerate() {
        let base = match header.as_ref().trim() {
            "" => format!("Unnamed: {}", i),
            _ => header.as_ref().to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}
