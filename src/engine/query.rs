//! Query orchestration
//!
//! Execution order for a slice request:
//! 1. Compile and apply filters (AND-combined)
//! 2. Stable sort of the surviving rows, if requested
//! 3. Pagination window over the filtered, sorted sequence
//! 4. Serialize the window into row objects

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::table::Table;

use super::distinct::{distinct_values, DistinctValueReport};
use super::errors::EngineResult;
use super::filters::{FilterProfile, FilterSpec, PredicateFilter};
use super::pager::PageSpec;
use super::serialize::row_object;
use super::sorter::{ResultSorter, SortSpec};
use super::stats::{compute_stats, ColumnStats};

/// A declarative row-slice request
#[derive(Debug, Clone)]
pub struct SliceRequest {
    /// Column name to filter, AND-combined
    pub filters: BTreeMap<String, FilterSpec>,
    pub sort: Option<SortSpec>,
    pub page: PageSpec,
    pub profile: FilterProfile,
}

impl SliceRequest {
    /// Unfiltered, unsorted window
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            filters: BTreeMap::new(),
            sort: None,
            page: PageSpec::new(offset, limit),
            profile: FilterProfile::Tabular,
        }
    }

    pub fn with_filter(mut self, column: impl Into<String>, spec: FilterSpec) -> Self {
        self.filters.insert(column.into(), spec);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_profile(mut self, profile: FilterProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// One page of serialized rows
#[derive(Debug, Clone, PartialEq)]
pub struct SliceResult {
    pub rows: Vec<Map<String, JsonValue>>,
    pub offset: usize,
    pub limit: usize,
    /// Row count after filtering, before pagination
    pub total_rows: usize,
    pub has_more: bool,
}

/// Stateless entry point for the three engine operations
pub struct QueryEngine;

impl QueryEngine {
    /// Filters, sorts and paginates `table`
    pub fn slice(table: &Table, request: &SliceRequest) -> SliceResult {
        let filter = PredicateFilter::compile(
            table,
            request
                .filters
                .iter()
                .map(|(name, spec)| (name.as_str(), spec)),
            request.profile,
        );
        let mut rows = filter.apply(table);

        if let Some(sort) = &request.sort {
            ResultSorter::sort(table, &mut rows, sort);
        }

        let page = request.page.window(rows.len());
        let serialized = page
            .slice(&rows)
            .iter()
            .map(|&row| row_object(table, row, request.profile))
            .collect();

        SliceResult {
            rows: serialized,
            offset: request.page.offset,
            limit: request.page.limit,
            total_rows: page.total,
            has_more: page.has_more(),
        }
    }

    pub fn column_stats(table: &Table, column: &str) -> EngineResult<ColumnStats> {
        compute_stats(table, column)
    }

    pub fn distinct_values(table: &Table, column: &str, limit: i64) -> EngineResult<DistinctValueReport> {
        distinct_values(table, column, limit)
    }
}
