//! Extension-based dispatch from a file on disk to a [`Table`]

use std::path::Path;

use super::column::{Table, TableSchema};
use super::delimited::read_delimited;
use super::errors::{TableError, TableResult};
use super::excel::read_excel;
use super::parquet_file::{describe_parquet, read_parquet};

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Parquet,
    Csv,
    Tsv,
    Excel,
}

impl FileFormat {
    /// Detects the format from the (case-insensitive) file extension
    pub fn from_path(path: &Path) -> TableResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "parquet" => Ok(FileFormat::Parquet),
            "csv" => Ok(FileFormat::Csv),
            "tsv" => Ok(FileFormat::Tsv),
            "xlsx" | "xls" => Ok(FileFormat::Excel),
            "" => Err(TableError::UnsupportedFormat("unknown".to_string())),
            other => Err(TableError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Parquet => "Parquet",
            FileFormat::Csv => "CSV",
            FileFormat::Tsv => "TSV",
            FileFormat::Excel => "Excel",
        }
    }
}

/// Options for a single load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Append the synthetic original-position column (row-data requests only)
    pub original_row_index: bool,
}

impl LoadOptions {
    pub fn with_row_index() -> Self {
        Self {
            original_row_index: true,
        }
    }
}

/// Loads tables from disk. Stateless; each call reads the file afresh.
pub struct TableLoader;

impl TableLoader {
    /// Loads a file with default options
    pub fn load(path: &Path) -> TableResult<Table> {
        Self::load_with(path, LoadOptions::default())
    }

    pub fn load_with(path: &Path, options: LoadOptions) -> TableResult<Table> {
        let format = FileFormat::from_path(path)?;
        let table = Self::load_format(path, format)?;

        if options.original_row_index {
            Ok(table.with_original_row_index())
        } else {
            Ok(table)
        }
    }

    /// Loads a file as an explicit format, ignoring its extension
    pub fn load_format(path: &Path, format: FileFormat) -> TableResult<Table> {
        match format {
            FileFormat::Parquet => read_parquet(path),
            FileFormat::Csv => read_delimited(path, b',', format.label()),
            FileFormat::Tsv => read_delimited(path, b'\t', format.label()),
            FileFormat::Excel => read_excel(path),
        }
    }

    /// Schema and row count.
    ///
    /// Parquet answers from the footer alone; other formats require a full load.
    pub fn describe(path: &Path) -> TableResult<TableSchema> {
        match FileFormat::from_path(path)? {
            FileFormat::Parquet => describe_parquet(path),
            format => Ok(Self::load_format(path, format)?.schema()),
        }
    }
}
