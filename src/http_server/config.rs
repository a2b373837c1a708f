//! HTTP Server Configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object
//! (or no file at all) is a valid configuration.

use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8888)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory every request path is resolved against (default: working directory)
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// CORS allowed origins; empty means permissive
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Attach the error source chain to 500 responses
    #[serde(default)]
    pub include_traceback: bool,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Page size when a data request omits `limit`
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    /// Entry cap when a unique-values request omits `limit`
    #[serde(default = "default_unique_limit")]
    pub default_unique_limit: i64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_root_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8888".to_string(),
        "http://127.0.0.1:8888".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_limit() -> usize {
    500
}

fn default_unique_limit() -> i64 {
    100
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root_dir: default_root_dir(),
            cors_origins: default_cors_origins(),
            include_traceback: false,
            log_level: default_log_level(),
            default_page_limit: default_page_limit(),
            default_unique_limit: default_unique_limit(),
        }
    }
}

impl HttpServerConfig {
    /// Reads and validates a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default config with the specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Create a default config serving `root_dir`
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".to_string()));
        }
        if self.default_page_limit == 0 {
            return Err(ConfigError::Invalid(
                "default_page_limit must be positive".to_string(),
            ));
        }
        self.severity()?;
        if !self.root_dir.is_dir() {
            return Err(ConfigError::Invalid(format!(
                "root_dir {} is not a directory",
                self.root_dir.display()
            )));
        }
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> Result<Severity, ConfigError> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed bind address
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.socket_addr()
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid bind address {}: {}", self.socket_addr(), e)))
    }
}
