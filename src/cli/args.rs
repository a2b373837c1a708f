//! CLI argument definitions using clap
//!
//! Commands:
//! - tabviewer serve [--config <path>] [--root <dir>] [--port <n>]
//! - tabviewer query --endpoint <name> [--parquet-only] [--config <path>] [--root <dir>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tabviewer - browse Parquet, CSV, TSV and Excel files over HTTP
#[derive(Parser, Debug)]
#[command(name = "tabviewer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory request paths are resolved against
        #[arg(long)]
        root: Option<PathBuf>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one endpoint operation on a JSON request read from stdin
    Query {
        /// Operation to run
        #[arg(long, value_enum)]
        endpoint: Endpoint,

        /// Use the Parquet-only endpoint family
        #[arg(long)]
        parquet_only: bool,

        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory request paths are resolved against
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

/// Viewer operations reachable from `query`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Metadata,
    Data,
    ColumnStats,
    UniqueValues,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
