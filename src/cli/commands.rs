//! CLI command implementations

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::engine::FilterProfile;
use crate::http_server::{ApiError, ApiResult, HttpServer, HttpServerConfig, ViewerState};
use crate::observability::Logger;

use super::args::{Command, Endpoint};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Parse arguments and run the chosen command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, root, port } => {
            let config = resolve_config(config.as_deref(), root, port)?;
            serve(config)
        }
        Command::Query {
            endpoint,
            parquet_only,
            config,
            root,
        } => {
            let config = resolve_config(config.as_deref(), root, None)?;
            query(&config, endpoint, parquet_only)
        }
    }
}

/// Config file (or defaults) with command-line overrides applied, validated,
/// and the log level installed.
pub fn resolve_config(
    path: Option<&Path>,
    root: Option<PathBuf>,
    port: Option<u16>,
) -> CliResult<HttpServerConfig> {
    let mut config = match path {
        Some(path) => HttpServerConfig::load(path)?,
        None => HttpServerConfig::default(),
    };
    if let Some(root) = root {
        config.root_dir = root;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;

    Logger::set_min_severity(config.severity()?);
    Ok(config)
}

/// Start the HTTP server and serve until killed
pub fn serve(config: HttpServerConfig) -> CliResult<()> {
    let server = HttpServer::with_config(config)
        .map_err(|e| CliError::boot_failed(format!("Failed to resolve root directory: {}", e)))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Read one request from stdin, run it, write one response to stdout.
///
/// Request failures are reported on stdout as error responses; only I/O and
/// setup failures are returned as errors.
pub fn query(config: &HttpServerConfig, endpoint: Endpoint, parquet_only: bool) -> CliResult<()> {
    let profile = if parquet_only {
        FilterProfile::Basic
    } else {
        FilterProfile::Tabular
    };
    if profile == FilterProfile::Basic
        && matches!(endpoint, Endpoint::ColumnStats | Endpoint::UniqueValues)
    {
        return Err(CliError::unsupported_endpoint(endpoint_name(endpoint)));
    }

    let state = ViewerState::new(config)
        .map_err(|e| CliError::config_error(format!("Failed to resolve root directory: {}", e)))?;
    let request = read_request(&mut io::stdin().lock())?;

    match execute(&state, endpoint, profile, request) {
        Ok(data) => write_response(data),
        Err(err) => write_error(err.error_type(), &err.to_string()),
    }
}

/// Runs one endpoint operation on a JSON request value
pub fn execute(
    state: &ViewerState,
    endpoint: Endpoint,
    profile: FilterProfile,
    request: Value,
) -> ApiResult<Value> {
    match endpoint {
        Endpoint::Metadata => to_json(state.metadata(&parse(request)?, profile)?),
        Endpoint::Data => to_json(state.data(&parse(request)?, profile)?),
        Endpoint::ColumnStats => to_json(state.column_stats(&parse(request)?)?),
        Endpoint::UniqueValues => to_json(state.unique_values(&parse(request)?)?),
    }
}

fn parse<T: DeserializeOwned>(request: Value) -> ApiResult<T> {
    serde_json::from_value(request).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

fn to_json<T: Serialize>(response: T) -> ApiResult<Value> {
    serde_json::to_value(response).map_err(|e| ApiError::Internal(e.to_string()))
}

fn endpoint_name(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Metadata => "metadata",
        Endpoint::Data => "data",
        Endpoint::ColumnStats => "column-stats",
        Endpoint::UniqueValues => "unique-values",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn state(dir: &Path) -> ViewerState {
        ViewerState::new(&HttpServerConfig::with_root(dir)).unwrap()
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(None, Some(dir.path().to_path_buf()), Some(9100)).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.root_dir, dir.path());
    }

    #[test]
    fn test_bad_root_is_config_error() {
        let err = resolve_config(None, Some(PathBuf::from("/definitely/not/here")), None).unwrap_err();
        assert_eq!(err.code_str(), "TABVIEW_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_execute_unique_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("f.tsv"), "flag\n0\n1\n0\n").unwrap();

        let data = execute(
            &state(dir.path()),
            Endpoint::UniqueValues,
            FilterProfile::Tabular,
            json!({"path": "f.tsv", "columnName": "flag"}),
        )
        .unwrap();
        assert_eq!(
            data,
            json!({"values": ["0", "1"], "counts": [2, 1], "limit": 100, "total_count": 2})
        );
    }

    #[test]
    fn test_execute_reports_request_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(
            &state(dir.path()),
            Endpoint::Metadata,
            FilterProfile::Tabular,
            json!({"path": "missing.parquet"}),
        )
        .unwrap_err();
        assert_eq!(err.error_type(), "PathNotFound");

        let err = execute(
            &state(dir.path()),
            Endpoint::Data,
            FilterProfile::Tabular,
            json!({"path": "a.csv", "offset": -1}),
        )
        .unwrap_err();
        assert_eq!(err.error_type(), "InvalidBody");
    }
}
