//! Query Engine subsystem
//!
//! Operates on a loaded [`Table`](crate::table::Table) and never on files.
//!
//! # Slice execution (strict order)
//!
//! 1. Filter rows with the compiled predicates
//! 2. Stable sort by one column (skipped if the column is unknown)
//! 3. Paginate the filtered, sorted sequence
//! 4. Serialize cells to wire-safe JSON
//!
//! Column statistics and distinct-value reports run over the whole table.

mod distinct;
mod errors;
mod filters;
mod pager;
mod query;
mod serialize;
mod sorter;
mod stats;

pub use distinct::{distinct_values, DistinctValueReport};
pub use errors::{EngineError, EngineResult};
pub use filters::{CompareOp, FilterProfile, FilterSpec, PredicateFilter};
pub use pager::{Page, PageSpec};
pub use query::{QueryEngine, SliceRequest, SliceResult};
pub use serialize::{row_object, serialize_value, ROW_INDEX};
pub use sorter::{ResultSorter, SortDirection, SortSpec};
pub use stats::{compute_stats, ColumnStats, NumericStats, StatsDetails, TemporalStats, TextStats};
