//! # Viewer HTTP Server Module
//!
//! Host glue around the table loader and query engine.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /jupyterlab-tabular-data-viewer-extension/{metadata,data,column-stats,unique-values}`
//! - `POST /jupyterlab-parquet-viewer-extension/{metadata,data}` - Parquet only

pub mod config;
pub mod errors;
pub mod parquet_routes;
pub mod requests;
pub mod resolver;
pub mod server;
pub mod viewer_routes;

pub use config::{ConfigError, HttpServerConfig};
pub use errors::{ApiError, ApiFailure, ApiResult, ErrorResponse};
pub use resolver::{PathResolver, RootPathResolver};
pub use server::{HttpServer, PARQUET_PREFIX, VIEWER_PREFIX};
pub use viewer_routes::ViewerState;
