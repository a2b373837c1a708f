//! Table loader errors

use std::error::Error as StdError;

use thiserror::Error;

/// Result type for table loading
pub type TableResult<T> = Result<T, TableError>;

/// Boxed underlying cause of a read failure
pub type ReadCause = Box<dyn StdError + Send + Sync + 'static>;

/// Errors raised while turning a file into a [`Table`](super::Table)
#[derive(Debug, Error)]
pub enum TableError {
    /// Extension is not one of parquet/csv/tsv/xlsx/xls
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The file is malformed or cannot be decoded
    #[error("Failed to read {format} file: {source}")]
    Read {
        format: &'static str,
        #[source]
        source: ReadCause,
    },

    /// The file could not be opened or read from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Columns violate the table invariants (length or name uniqueness)
    #[error("Invalid table: {0}")]
    InvalidTable(String),
}

impl TableError {
    /// Wrap a format-specific failure
    pub fn read(format: &'static str, source: impl Into<ReadCause>) -> Self {
        TableError::Read {
            format,
            source: source.into(),
        }
    }

    /// Machine-readable error label
    pub fn error_type(&self) -> &'static str {
        match self {
            TableError::UnsupportedFormat(_) => "UnsupportedFormat",
            TableError::Read { .. } | TableError::Io(_) | TableError::InvalidTable(_) => {
                "ReadError"
            }
        }
    }
}
