//! # HTTP Server
//!
//! Combines the viewer routers, the health check and CORS into one router.

use std::io;
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::Logger;

use super::config::HttpServerConfig;
use super::parquet_routes::parquet_routes;
use super::viewer_routes::{viewer_routes, ViewerState};

/// Mount point of the multi-format endpoints
pub const VIEWER_PREFIX: &str = "/jupyterlab-tabular-data-viewer-extension";

/// Mount point of the Parquet-only endpoints
pub const PARQUET_PREFIX: &str = "/jupyterlab-parquet-viewer-extension";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

/// HTTP server for the tabular viewer
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server with the given configuration.
    ///
    /// Fails if the root directory cannot be resolved.
    pub fn with_config(config: HttpServerConfig) -> io::Result<Self> {
        let state = Arc::new(ViewerState::new(&config)?);
        let router = Self::build_router(&config, state);
        Ok(Self { config, router })
    }

    /// Create a server around existing state (custom path resolvers)
    pub fn with_state(config: HttpServerConfig, state: Arc<ViewerState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, state: Arc<ViewerState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health_handler))
            .nest(VIEWER_PREFIX, viewer_routes(state.clone()))
            .nest(PARQUET_PREFIX, parquet_routes(state))
            .layer(ServiceBuilder::new().layer(cors))
    }

    pub fn config(&self) -> &HttpServerConfig {
        &self.config
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> io::Result<()> {
        let addr = self
            .config
            .bind_addr()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        let listener = TcpListener::bind(addr).await?;
        let addr_text = listener.local_addr()?.to_string();
        let root = self.config.root_dir.display().to_string();
        Logger::info(
            "SERVER_LISTENING",
            &[("addr", addr_text.as_str()), ("root_dir", root.as_str())],
        );

        axum::serve(listener, self.router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::with_config(HttpServerConfig::with_port(8080)).unwrap();
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_root_fails() {
        let config = HttpServerConfig::with_root("/definitely/not/here");
        assert!(HttpServer::with_config(config).is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let router = HttpServer::with_config(HttpServerConfig::default())
            .unwrap()
            .router();
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
