//! CLI module
//!
//! - serve: start the HTTP server
//! - query: one-shot endpoint operation over stdin/stdout

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Endpoint};
pub use commands::{execute, query, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, read_request, success_envelope, write_error, write_response};
