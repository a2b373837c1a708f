//! Top-N distinct values of a column

use std::collections::HashMap;

use crate::table::Table;

use super::errors::{EngineError, EngineResult};

/// Distinct text values with their frequencies, most frequent first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinctValueReport {
    /// `(value, count)` pairs, sorted by count descending
    pub entries: Vec<(String, usize)>,
    /// Number of distinct values before truncation
    pub total_distinct: usize,
}

impl DistinctValueReport {
    pub fn values(&self) -> Vec<String> {
        self.entries.iter().map(|(v, _)| v.clone()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, c)| *c).collect()
    }
}

/// Counts distinct values of `column_name` over its text view.
///
/// Nulls are counted as `(null)`. Equal counts keep first-occurrence order.
/// A `limit` of zero or less returns every distinct value.
pub fn distinct_values(table: &Table, column_name: &str, limit: i64) -> EngineResult<DistinctValueReport> {
    let column = table
        .column(column_name)
        .ok_or_else(|| EngineError::ColumnNotFound(column_name.to_string()))?;

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, usize)> = Vec::new();
    for value in column.values() {
        let text = value.to_text_or_null_label();
        match slots.get(&text) {
            Some(&slot) => entries[slot].1 += 1,
            None => {
                slots.insert(text.clone(), entries.len());
                entries.push((text, 1));
            }
        }
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1));
    let total_distinct = entries.len();
    if limit > 0 {
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    Ok(DistinctValueReport {
        entries,
        total_distinct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnType, Value};

    fn table() -> Table {
        let values = ["b", "a", "b", "c", "a", "b"]
            .iter()
            .map(|s| Value::Str(s.to_string()))
            .chain([Value::Null, Value::Null])
            .collect();
        Table::new(vec![Column::new("s", ColumnType::string(), values)]).unwrap()
    }

    #[test]
    fn test_sorted_by_count_with_null_label() {
        let report = distinct_values(&table(), "s", 0).unwrap();
        assert_eq!(report.values(), vec!["b", "a", "(null)", "c"]);
        assert_eq!(report.counts(), vec![3, 2, 2, 1]);
        assert_eq!(report.total_distinct, 4);
        assert_eq!(report.counts().iter().sum::<usize>(), 8);
    }

    #[test]
    fn test_limit_truncates_after_sorting() {
        let report = distinct_values(&table(), "s", 2).unwrap();
        assert_eq!(report.values(), vec!["b", "a"]);
        assert_eq!(report.total_distinct, 4);
    }

    #[test]
    fn test_negative_limit_means_unlimited() {
        let report = distinct_values(&table(), "s", -1).unwrap();
        assert_eq!(report.entries.len(), 4);
    }

    #[test]
    fn test_numbers_are_counted_as_text() {
        let t = Table::new(vec![Column::new(
            "n",
            ColumnType::int64(),
            vec![Value::Int(0), Value::Int(1), Value::Int(0)],
        )])
        .unwrap();
        let report = distinct_values(&t, "n", 100).unwrap();
        assert_eq!(report.entries, vec![("0".to_string(), 2), ("1".to_string(), 1)]);
    }

    #[test]
    fn test_missing_column() {
        assert_eq!(
            distinct_values(&table(), "x", 10),
            Err(EngineError::ColumnNotFound("x".to_string()))
        );
    }
}
