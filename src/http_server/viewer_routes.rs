//! Multi-format Viewer Routes
//!
//! Endpoints under `/jupyterlab-tabular-data-viewer-extension`:
//! `metadata`, `data`, `column-stats` and `unique-values`. All accept a JSON
//! POST body. The operations themselves live on [`ViewerState`] so the CLI
//! can run them without HTTP.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::de::DeserializeOwned;

use crate::engine::{ColumnStats, FilterProfile, PageSpec, QueryEngine, SliceRequest};
use crate::observability::{Logger, RequestScope};
use crate::table::{FileFormat, LoadOptions, TableError, TableLoader};

use super::config::HttpServerConfig;
use super::errors::{ApiError, ApiFailure, ApiResult};
use super::requests::{
    DataRequest, DataResponse, MetadataRequest, MetadataResponse, StatsRequest,
    UniqueValuesRequest, UniqueValuesResponse,
};
use super::resolver::{PathResolver, RootPathResolver};

// ==================
// Shared State
// ==================

/// Immutable per-server state shared by every handler
pub struct ViewerState {
    resolver: Arc<dyn PathResolver>,
    default_page_limit: usize,
    default_unique_limit: i64,
    include_traceback: bool,
}

impl ViewerState {
    /// Builds state resolving paths under `config.root_dir`
    pub fn new(config: &HttpServerConfig) -> io::Result<Self> {
        let resolver = RootPathResolver::new(&config.root_dir)?;
        Ok(Self::with_resolver(Arc::new(resolver), config))
    }

    pub fn with_resolver(resolver: Arc<dyn PathResolver>, config: &HttpServerConfig) -> Self {
        Self {
            resolver,
            default_page_limit: config.default_page_limit,
            default_unique_limit: config.default_unique_limit,
            include_traceback: config.include_traceback,
        }
    }

    pub fn include_traceback(&self) -> bool {
        self.include_traceback
    }

    /// Resolves a request path; the basic profile serves Parquet only
    fn resolve(&self, logical: &str, profile: FilterProfile) -> ApiResult<PathBuf> {
        let path = self.resolver.resolve(logical)?;
        if profile == FilterProfile::Basic {
            let format = FileFormat::from_path(&path)?;
            if format != FileFormat::Parquet {
                return Err(TableError::UnsupportedFormat(format.label().to_ascii_lowercase()).into());
            }
        }
        Ok(path)
    }

    /// Column names, native types, row count and file size
    pub fn metadata(&self, request: &MetadataRequest, profile: FilterProfile) -> ApiResult<MetadataResponse> {
        let logical = request.path()?;
        Logger::info("METADATA_REQUEST", &[("path", logical)]);

        let path = self.resolve(logical, profile)?;
        let schema = TableLoader::describe(&path)?;
        let file_size = fs::metadata(&path).map_err(TableError::from)?.len();
        Ok(MetadataResponse::new(schema, file_size))
    }

    /// One filtered, sorted page of rows
    pub fn data(&self, request: &DataRequest, profile: FilterProfile) -> ApiResult<DataResponse> {
        let logical = request.path()?;
        let offset = request.offset.unwrap_or(0);
        let limit = request.limit.unwrap_or(self.default_page_limit);
        let (offset_text, limit_text) = (offset.to_string(), limit.to_string());
        Logger::info(
            "DATA_REQUEST",
            &[
                ("path", logical),
                ("offset", offset_text.as_str()),
                ("limit", limit_text.as_str()),
            ],
        );

        let path = self.resolve(logical, profile)?;
        let options = match profile {
            FilterProfile::Tabular => LoadOptions::with_row_index(),
            FilterProfile::Basic => LoadOptions::default(),
        };
        let table = TableLoader::load_with(&path, options)?;

        let slice = SliceRequest {
            filters: request.filter_specs(),
            sort: request.sort_spec(),
            page: PageSpec::new(offset, limit),
            profile,
        };
        Ok(QueryEngine::slice(&table, &slice).into())
    }

    pub fn column_stats(&self, request: &StatsRequest) -> ApiResult<ColumnStats> {
        let logical = request.path()?;
        let column = request.column_name()?;
        Logger::info("STATS_REQUEST", &[("path", logical), ("column", column)]);

        let path = self.resolve(logical, FilterProfile::Tabular)?;
        let table = TableLoader::load(&path)?;
        Ok(QueryEngine::column_stats(&table, column)?)
    }

    pub fn unique_values(&self, request: &UniqueValuesRequest) -> ApiResult<UniqueValuesResponse> {
        let logical = request.path()?;
        let column = request.column_name()?;
        let limit = request.limit.unwrap_or(self.default_unique_limit);
        Logger::info("UNIQUE_VALUES_REQUEST", &[("path", logical), ("column", column)]);

        let path = self.resolve(logical, FilterProfile::Tabular)?;
        let table = TableLoader::load(&path)?;
        let report = QueryEngine::distinct_values(&table, column, limit)?;
        Ok(UniqueValuesResponse {
            values: report.values(),
            counts: report.counts(),
            limit,
            total_count: report.total_distinct,
        })
    }
}

// ==================
// Request plumbing
// ==================

/// Parses a JSON body; an empty body reads as `{}`
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let trimmed = body.iter().all(u8::is_ascii_whitespace);
    let result = if trimmed {
        serde_json::from_slice(b"{}")
    } else {
        serde_json::from_slice(body)
    };
    result.map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// Parses the body, then runs `op` on the blocking pool inside a request scope
pub(super) async fn run_blocking<Req, Resp, F>(
    state: Arc<ViewerState>,
    name: &'static str,
    body: Bytes,
    op: F,
) -> Result<Json<Resp>, ApiFailure>
where
    Req: DeserializeOwned + Send + 'static,
    Resp: Send + 'static,
    F: FnOnce(&ViewerState, Req) -> ApiResult<Resp> + Send + 'static,
{
    let include_traceback = state.include_traceback();
    let scope = RequestScope::new(name);

    let result = match parse_body::<Req>(&body) {
        Ok(request) => tokio::task::spawn_blocking(move || op(state.as_ref(), request))
            .await
            .unwrap_or_else(|e| Err(ApiError::Internal(format!("request task failed: {}", e)))),
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => {
            scope.complete();
            Ok(Json(response))
        }
        Err(err) => {
            scope.fail(&err.to_string());
            Err(err.with_traceback(include_traceback))
        }
    }
}

// ==================
// Viewer Routes
// ==================

/// Create the multi-format viewer routes
pub fn viewer_routes(state: Arc<ViewerState>) -> Router {
    Router::new()
        .route("/metadata", post(metadata_handler))
        .route("/data", post(data_handler))
        .route("/column-stats", post(column_stats_handler))
        .route("/unique-values", post(unique_values_handler))
        .with_state(state)
}

async fn metadata_handler(
    State(state): State<Arc<ViewerState>>,
    body: Bytes,
) -> Result<Json<MetadataResponse>, ApiFailure> {
    run_blocking(state, "METADATA", body, |state, request: MetadataRequest| {
        state.metadata(&request, FilterProfile::Tabular)
    })
    .await
}

async fn data_handler(
    State(state): State<Arc<ViewerState>>,
    body: Bytes,
) -> Result<Json<DataResponse>, ApiFailure> {
    run_blocking(state, "DATA", body, |state, request: DataRequest| {
        state.data(&request, FilterProfile::Tabular)
    })
    .await
}

async fn column_stats_handler(
    State(state): State<Arc<ViewerState>>,
    body: Bytes,
) -> Result<Json<ColumnStats>, ApiFailure> {
    run_blocking(state, "COLUMN_STATS", body, |state, request: StatsRequest| {
        state.column_stats(&request)
    })
    .await
}

async fn unique_values_handler(
    State(state): State<Arc<ViewerState>>,
    body: Bytes,
) -> Result<Json<UniqueValuesResponse>, ApiFailure> {
    run_blocking(state, "UNIQUE_VALUES", body, |state, request: UniqueValuesRequest| {
        state.unique_values(&request)
    })
    .await
}
