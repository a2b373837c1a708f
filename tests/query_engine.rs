//! Query Engine Tests
//!
//! End-to-end slice, stats and distinct-value behaviour over a Parquet
//! fixture loaded the way the viewer endpoints load it.

mod common;

use serde_json::json;
use tabviewer::engine::{
    FilterProfile, FilterSpec, QueryEngine, SliceRequest, SortSpec, StatsDetails, ROW_INDEX,
};
use tabviewer::table::{LoadOptions, Table, TableLoader};

use common::{create_temp_dir, write_maintenance_parquet, MAINTENANCE_ROWS, MAINTENANCE_ROW_COUNT};

fn maintenance_table() -> Table {
    let dir = create_temp_dir();
    let path = write_maintenance_parquet(dir.path());
    TableLoader::load_with(&path, LoadOptions::with_row_index()).unwrap()
}

// =============================================================================
// Slices
// =============================================================================

#[test]
fn test_regex_filter_selects_exact_flag_rows() {
    let table = maintenance_table();
    let request = SliceRequest::page(0, 100)
        .with_filter("is_maintenance", FilterSpec::regex("^(1)$", false));

    let result = QueryEngine::slice(&table, &request);
    assert_eq!(result.total_rows, MAINTENANCE_ROWS.len());
    assert_eq!(result.rows.len(), MAINTENANCE_ROWS.len());
    for row in &result.rows {
        assert_eq!(row["is_maintenance"], json!(1));
    }

    let indices: Vec<_> = result.rows.iter().map(|r| r[ROW_INDEX].clone()).collect();
    let expected: Vec<_> = MAINTENANCE_ROWS.iter().map(|&i| json!(i + 1)).collect();
    assert_eq!(indices, expected);
}

#[test]
fn test_first_row_carries_row_index() {
    let table = maintenance_table();
    let result = QueryEngine::slice(&table, &SliceRequest::page(0, 1));

    assert_eq!(result.rows.len(), 1);
    let row = &result.rows[0];
    assert_eq!(row["email"], json!("user0@example.com"));
    assert_eq!(row[ROW_INDEX], json!(1));
    assert!(!row.contains_key("__original_row_index__"));
    assert_eq!(row.keys().last().map(String::as_str), Some(ROW_INDEX));
    assert!(result.has_more);
}

#[test]
fn test_pages_reconstruct_full_sequence() {
    let table = maintenance_table();
    let mut seen = Vec::new();
    let mut offset = 0;

    loop {
        let result = QueryEngine::slice(&table, &SliceRequest::page(offset, 4));
        assert_eq!(result.total_rows, MAINTENANCE_ROW_COUNT);
        seen.extend(result.rows.iter().map(|r| r[ROW_INDEX].clone()));
        if !result.has_more {
            break;
        }
        offset += 4;
    }

    let expected: Vec<_> = (1..=MAINTENANCE_ROW_COUNT).map(|i| json!(i)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_sort_is_stable_for_ties() {
    let table = maintenance_table();
    let request = SliceRequest::page(0, 100).with_sort(SortSpec::desc("is_maintenance"));
    let result = QueryEngine::slice(&table, &request);

    let indices: Vec<u64> = result
        .rows
        .iter()
        .map(|r| r[ROW_INDEX].as_u64().unwrap())
        .collect();
    let (ones, zeros) = indices.split_at(MAINTENANCE_ROWS.len());
    assert_eq!(ones, &[2, 5, 9, 12]);
    assert!(zeros.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_null_label_filter_matches_null_rows() {
    let table = maintenance_table();
    let request =
        SliceRequest::page(0, 100).with_filter("score", FilterSpec::contains("(null)"));
    let result = QueryEngine::slice(&table, &request);

    assert_eq!(result.total_rows, 2);
    for row in &result.rows {
        assert!(row["score"].is_null());
    }
}

#[test]
fn test_numeric_filter_and_combined() {
    let table = maintenance_table();
    let request = SliceRequest::page(0, 100)
        .with_filter("is_maintenance", FilterSpec::numeric("=", "1").unwrap())
        .with_filter("score", FilterSpec::numeric(">", "10").unwrap());
    let result = QueryEngine::slice(&table, &request);

    // rows 8 and 11 have scores 12.0 and 16.5; row 4 is null
    let indices: Vec<_> = result.rows.iter().map(|r| r[ROW_INDEX].clone()).collect();
    assert_eq!(indices, vec![json!(9), json!(12)]);
}

#[test]
fn test_basic_profile_omits_row_index() {
    let dir = create_temp_dir();
    let table = TableLoader::load(&write_maintenance_parquet(dir.path())).unwrap();
    let request = SliceRequest::page(0, 2).with_profile(FilterProfile::Basic);
    let result = QueryEngine::slice(&table, &request);

    assert_eq!(result.rows.len(), 2);
    assert!(!result.rows[0].contains_key(ROW_INDEX));
}

// =============================================================================
// Distinct values and stats
// =============================================================================

#[test]
fn test_unique_values_of_flag_column() {
    let table = maintenance_table();
    let report = QueryEngine::distinct_values(&table, "is_maintenance", 100).unwrap();

    assert_eq!(report.values(), vec!["0".to_string(), "1".to_string()]);
    assert_eq!(report.counts(), vec![9, 4]);
    assert_eq!(report.counts().iter().sum::<usize>(), MAINTENANCE_ROW_COUNT);
    assert_eq!(report.total_distinct, 2);
}

#[test]
fn test_unique_values_limit_truncates() {
    let table = maintenance_table();
    let report = QueryEngine::distinct_values(&table, "email", 3).unwrap();
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.total_distinct, MAINTENANCE_ROW_COUNT);
}

#[test]
fn test_stats_counts_are_consistent() {
    let table = maintenance_table();
    let stats = QueryEngine::column_stats(&table, "score").unwrap();

    assert_eq!(stats.total_rows, MAINTENANCE_ROW_COUNT);
    assert_eq!(stats.null_count, 2);
    assert_eq!(stats.non_null_count + stats.null_count, stats.total_rows);
    assert!(stats.unique_count <= stats.non_null_count);
    assert!((stats.non_null_percentage + stats.null_percentage - 100.0).abs() < 0.05);

    match stats.details {
        Some(StatsDetails::Numeric(ref numeric)) => {
            let min = numeric.min_value.unwrap();
            let max = numeric.max_value.unwrap();
            let mean = numeric.mean.unwrap();
            let median = numeric.median.unwrap();
            assert_eq!(min, 0.0);
            assert_eq!(max, 18.0);
            assert!(min <= mean && mean <= max);
            assert!(min <= median && median <= max);
        }
        ref other => panic!("expected numeric details, got {:?}", other),
    }
}

#[test]
fn test_stats_on_missing_column() {
    let table = maintenance_table();
    let err = QueryEngine::column_stats(&table, "nope").unwrap_err();
    assert_eq!(err.to_string(), "Column 'nope' not found in table");
}
