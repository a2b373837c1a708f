//! Parquet-only Viewer Routes
//!
//! Endpoints under `/jupyterlab-parquet-viewer-extension`: `metadata` and
//! `data`, served with the basic filter profile. Rows carry plain columns
//! only, and any path that is not a `.parquet` file is rejected.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::post, Json, Router};

use crate::engine::FilterProfile;

use super::errors::ApiFailure;
use super::requests::{DataRequest, DataResponse, MetadataRequest, MetadataResponse};
use super::viewer_routes::{run_blocking, ViewerState};

/// Create the Parquet-only routes
pub fn parquet_routes(state: Arc<ViewerState>) -> Router {
    Router::new()
        .route("/metadata", post(metadata_handler))
        .route("/data", post(data_handler))
        .with_state(state)
}

async fn metadata_handler(
    State(state): State<Arc<ViewerState>>,
    body: Bytes,
) -> Result<Json<MetadataResponse>, ApiFailure> {
    run_blocking(state, "PARQUET_METADATA", body, |state, request: MetadataRequest| {
        state.metadata(&request, FilterProfile::Basic)
    })
    .await
}

async fn data_handler(
    State(state): State<Arc<ViewerState>>,
    body: Bytes,
) -> Result<Json<DataResponse>, ApiFailure> {
    run_blocking(state, "PARQUET_DATA", body, |state, request: DataRequest| {
        state.data(&request, FilterProfile::Basic)
    })
    .await
}
