//! tabviewer - browse tabular files over HTTP
//!
//! Two components, leaf first:
//!
//! - [`table`]: loads a Parquet, CSV, TSV or Excel file into one in-memory
//!   columnar [`Table`](table::Table)
//! - [`engine`]: filters, sorts, paginates, and computes statistics and
//!   distinct-value reports over a loaded table
//!
//! [`http_server`] wires both behind JSON endpoints, [`cli`] exposes the
//! server and one-shot queries, and [`observability`] provides structured
//! logging.

pub mod cli;
pub mod engine;
pub mod http_server;
pub mod observability;
pub mod table;
