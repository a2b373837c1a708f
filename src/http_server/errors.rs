//! # Viewer API Errors
//!
//! Every handler failure becomes a JSON body `{error, error_type, traceback?}`
//! with the matching HTTP status.

use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::engine::EngineError;
use crate::observability::Logger;
use crate::table::TableError;

/// Result type for viewer operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Viewer API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Required body field absent or empty
    #[error("No {0} provided")]
    MissingParameter(&'static str),

    /// Body is not valid JSON for the endpoint
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Path does not exist under the served root
    #[error("File not found: {0}")]
    PathNotFound(String),

    /// Loader failure: unsupported extension (4xx) or unreadable file (5xx)
    #[error(transparent)]
    Table(#[from] TableError),

    /// Engine failure: unknown column
    #[error(transparent)]
    Engine(#[from] EngineError),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::PathNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Table(TableError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            ApiError::Table(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Engine(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "MissingParameter",
            ApiError::InvalidBody(_) => "InvalidBody",
            ApiError::PathNotFound(_) => "PathNotFound",
            ApiError::Table(e) => e.error_type(),
            ApiError::Engine(e) => e.error_type(),
            ApiError::Internal(_) => "InternalError",
        }
    }

    /// Renders the error and its source chain, outermost first
    pub fn traceback(&self) -> String {
        let mut lines = vec![self.to_string()];
        let mut source = self.source();
        while let Some(cause) = source {
            lines.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        lines.join("\n")
    }

    /// Pairs the error with the deployment's traceback policy
    pub fn with_traceback(self, include_traceback: bool) -> ApiFailure {
        ApiFailure {
            error: self,
            include_traceback,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl ErrorResponse {
    /// Tracebacks are only ever attached to 5xx bodies
    pub fn from_error(err: &ApiError, include_traceback: bool) -> Self {
        let traceback = (include_traceback && err.status_code().is_server_error())
            .then(|| err.traceback());
        Self {
            error: err.to_string(),
            error_type: err.error_type().to_string(),
            traceback,
        }
    }
}

/// An [`ApiError`] on its way out of a handler
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    pub include_traceback: bool,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            let traceback = self.error.traceback();
            Logger::error(
                "HANDLER_ERROR",
                &[
                    ("error_type", self.error.error_type()),
                    ("traceback", traceback.as_str()),
                ],
            );
        }
        let body = ErrorResponse::from_error(&self.error, self.include_traceback);
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.with_traceback(false).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingParameter("file path").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PathNotFound("a.csv".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TableError::UnsupportedFormat("txt".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(EngineError::ColumnNotFound("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(TableError::read("CSV", "bad row")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(ApiError::MissingParameter("column name").error_type(), "MissingParameter");
        assert_eq!(
            ApiError::from(TableError::Io(io::Error::new(io::ErrorKind::Other, "disk"))).error_type(),
            "ReadError"
        );
        assert_eq!(
            ApiError::from(EngineError::ColumnNotFound("x".into())).error_type(),
            "ColumnNotFound"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::MissingParameter("file path").to_string(),
            "No file path provided"
        );
        assert_eq!(
            ApiError::from(EngineError::ColumnNotFound("age".into())).to_string(),
            "Column 'age' not found in table"
        );
    }

    #[test]
    fn test_traceback_walks_sources() {
        let err = ApiError::from(TableError::read("Parquet", "footer truncated"));
        let traceback = err.traceback();
        assert!(traceback.starts_with("Failed to read Parquet file: footer truncated"));
        assert!(traceback.contains("caused by: footer truncated"));
    }

    #[test]
    fn test_traceback_only_on_server_errors() {
        let server = ApiError::Internal("boom".into());
        assert!(ErrorResponse::from_error(&server, true).traceback.is_some());
        assert!(ErrorResponse::from_error(&server, false).traceback.is_none());

        let client = ApiError::PathNotFound("a.csv".into());
        assert!(ErrorResponse::from_error(&client, true).traceback.is_none());
    }
}
