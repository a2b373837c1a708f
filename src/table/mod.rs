//! Table Loader subsystem
//!
//! Converts a file on disk into a single immutable in-memory [`Table`].
//! The format is chosen by extension:
//!
//! - `.parquet` - read natively through Arrow
//! - `.csv` / `.tsv` - delimited text, UTF-8 with a Windows-1252 fallback
//! - `.xlsx` / `.xls` - first worksheet, first row as header
//!
//! Nothing here knows about filtering or statistics; that is the
//! [`engine`](crate::engine)'s job.

mod column;
mod delimited;
mod errors;
mod excel;
mod infer;
mod loader;
mod parquet_file;
mod value;

pub use column::{
    Column, ColumnSchema, ColumnType, Table, TableSchema, TypeKind, ORIGINAL_ROW_INDEX,
};
pub use errors::{TableError, TableResult};
pub use loader::{FileFormat, LoadOptions, TableLoader};
pub use value::{Value, NULL_LABEL};

pub(crate) use value::{decimal_to_f64, format_datetime};
