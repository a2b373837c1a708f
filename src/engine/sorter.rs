//! Result sorting
//!
//! Sorts a selection of row positions by one column. The sort is stable, so
//! rows with equal keys keep their filtered order.

use std::cmp::Ordering;

use crate::table::{Table, Value};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `"asc"` is ascending; anything else is descending
    pub fn from_order(order: &str) -> Self {
        if order == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Single-column sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Sorts row selections
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts `rows` in place by the sort column.
    ///
    /// Returns `false` (and leaves `rows` untouched) when the column does
    /// not exist.
    pub fn sort(table: &Table, rows: &mut [usize], spec: &SortSpec) -> bool {
        let Some(column) = table.column(&spec.column) else {
            return false;
        };
        let values = column.values();

        rows.sort_by(|&a, &b| Self::compare_values(&values[a], &values[b], spec.direction));
        true
    }

    /// Orders two cells.
    ///
    /// Nulls sort last and NaN sorts just before them, in both directions;
    /// only the ordering among ordinary values is reversed for descending.
    fn compare_values(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
        let (rank_a, rank_b) = (Self::placement(a), Self::placement(b));
        if rank_a != rank_b {
            return rank_a.cmp(&rank_b);
        }
        if rank_a != 0 {
            return Ordering::Equal;
        }

        let ordering = a.compare(b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    fn placement(value: &Value) -> u8 {
        match value {
            Value::Null => 2,
            Value::Float(v) if v.is_nan() => 1,
            _ => 0,
        }
    }
}
