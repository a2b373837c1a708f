//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

/// Rows of the maintenance fixture whose `is_maintenance` is 1 (0-based)
pub const MAINTENANCE_ROWS: [usize; 4] = [1, 4, 8, 11];

pub const MAINTENANCE_ROW_COUNT: usize = 13;

pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Writes one record batch built from named columns to a Parquet file
pub fn write_parquet(path: &Path, columns: Vec<(&str, ArrayRef)>) {
    let batch = RecordBatch::try_from_iter(columns).expect("valid batch");
    let file = File::create(path).expect("create parquet file");
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("parquet writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");
}

/// 13-row table: `email`, `is_maintenance` (0/1, four ones) and `score`
/// (float with a null every fifth row)
pub fn write_maintenance_parquet(dir: &Path) -> PathBuf {
    let path = dir.join("maintenance.parquet");

    let emails: Vec<String> = (0..MAINTENANCE_ROW_COUNT)
        .map(|i| format!("user{}@example.com", i))
        .collect();
    let flags: Vec<i64> = (0..MAINTENANCE_ROW_COUNT)
        .map(|i| i64::from(MAINTENANCE_ROWS.contains(&i)))
        .collect();
    let scores: Vec<Option<f64>> = (0..MAINTENANCE_ROW_COUNT)
        .map(|i| if i % 5 == 4 { None } else { Some(i as f64 * 1.5) })
        .collect();

    write_parquet(
        &path,
        vec![
            ("email", Arc::new(StringArray::from(emails)) as ArrayRef),
            ("is_maintenance", Arc::new(Int64Array::from(flags)) as ArrayRef),
            ("score", Arc::new(Float64Array::from(scores)) as ArrayRef),
        ],
    );
    path
}

/// Small CSV with a null age and mixed-case names
pub fn write_people_csv(dir: &Path) -> PathBuf {
    let path = dir.join("people.csv");
    std::fs::write(
        &path,
        "name,age,city\nAlice,30,Paris\nbob,17,Berlin\nALINA,45,\ncarol,,Paris\n",
    )
    .expect("write csv");
    path
}
