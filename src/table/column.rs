//! Columnar table model

use std::collections::HashSet;

use super::errors::{TableError, TableResult};
use super::value::Value;

/// Name of the synthetic 1-based position column appended for row-data requests
pub const ORIGINAL_ROW_INDEX: &str = "__original_row_index__";

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    DateTime,
    Decimal,
    Binary,
    Other,
}

/// Column type: semantic kind plus the native type label shown to users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    kind: TypeKind,
    label: String,
    utc: bool,
}

impl ColumnType {
    pub fn new(kind: TypeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            utc: false,
        }
    }

    pub fn int64() -> Self {
        Self::new(TypeKind::Integer, "int64")
    }

    pub fn double() -> Self {
        Self::new(TypeKind::Float, "double")
    }

    pub fn string() -> Self {
        Self::new(TypeKind::String, "string")
    }

    pub fn boolean() -> Self {
        Self::new(TypeKind::Boolean, "bool")
    }

    pub fn date() -> Self {
        Self::new(TypeKind::Date, "date32[day]")
    }

    pub fn timestamp() -> Self {
        Self::new(TypeKind::DateTime, "timestamp[us]")
    }

    /// Marks a timestamp column as timezone-aware (values stored in UTC)
    pub fn with_utc(mut self) -> Self {
        self.utc = true;
        self
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Native type label, e.g. `int64` or `timestamp[ms, tz=UTC]`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True for timezone-aware timestamps
    pub fn is_utc(&self) -> bool {
        self.utc
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, TypeKind::Integer | TypeKind::Float)
    }

    /// Coarse display type: `int`, `float`, `string`, `date`, `datetime`,
    /// `boolean`, or the native label for everything else.
    pub fn simplified(&self) -> String {
        match self.kind {
            TypeKind::Integer => "int".to_string(),
            TypeKind::Float => "float".to_string(),
            TypeKind::String => "string".to_string(),
            TypeKind::Date => "date".to_string(),
            TypeKind::DateTime => "datetime".to_string(),
            TypeKind::Boolean => "boolean".to_string(),
            TypeKind::Decimal | TypeKind::Binary | TypeKind::Other => self.label.clone(),
        }
    }
}

/// A named, typed sequence of values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            column_type,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, row: usize) -> &Value {
        &self.values[row]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }
}

/// Name and native type label of one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub type_label: String,
}

/// Schema plus row count, as reported by the metadata endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub columns: Vec<ColumnSchema>,
    pub row_count: usize,
}

/// Immutable in-memory columnar table
///
/// Every column has `row_count` values and column names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table, validating the column invariants
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != row_count {
                return Err(TableError::InvalidTable(format!(
                    "column '{}' has {} values, expected {}",
                    column.name(),
                    column.len(),
                    row_count
                )));
            }
            if !seen.insert(column.name()) {
                return Err(TableError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn schema(&self) -> TableSchema {
        TableSchema {
            columns: self
                .columns
                .iter()
                .map(|c| ColumnSchema {
                    name: c.name().to_string(),
                    type_label: c.column_type().label().to_string(),
                })
                .collect(),
            row_count: self.row_count,
        }
    }

    /// Returns a new table with [`ORIGINAL_ROW_INDEX`] appended (1-based).
    ///
    /// A source column that already uses the reserved name is replaced.
    pub fn with_original_row_index(&self) -> Table {
        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| c.name() != ORIGINAL_ROW_INDEX)
            .cloned()
            .collect();
        let positions = (1..=self.row_count as i64).map(Value::Int).collect();
        columns.push(Column::new(ORIGINAL_ROW_INDEX, ColumnType::int64(), positions));
        Table {
            columns,
            row_count: self.row_count,
        }
    }
}
