//! CLI-specific error types
//!
//! CLI errors end the process; request-level failures are not CLI errors and
//! are written to stdout as error responses instead.

use std::fmt;
use std::io;

use crate::http_server::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Server failed to start
    BootFailed,
    /// Endpoint not offered by the chosen endpoint family
    UnsupportedEndpoint,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TABVIEW_CLI_CONFIG_ERROR",
            Self::IoError => "TABVIEW_CLI_IO_ERROR",
            Self::BootFailed => "TABVIEW_CLI_BOOT_FAILED",
            Self::UnsupportedEndpoint => "TABVIEW_CLI_UNSUPPORTED_ENDPOINT",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn unsupported_endpoint(endpoint: &str) -> Self {
        Self::new(
            CliErrorCode::UnsupportedEndpoint,
            format!("{} is not available on the Parquet-only endpoints", endpoint),
        )
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("port must be non-zero");
        assert_eq!(
            err.to_string(),
            "TABVIEW_CLI_CONFIG_ERROR: port must be non-zero"
        );
    }

    #[test]
    fn test_conversions() {
        let err = CliError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
        assert_eq!(err.code(), CliErrorCode::IoError);

        let err = CliError::from(ConfigError::Invalid("bad".into()));
        assert_eq!(err.code_str(), "TABVIEW_CLI_CONFIG_ERROR");
    }
}
