//! tabviewer CLI entry point
//!
//! Parses arguments and dispatches through [`cli::run`]; prints the error
//! and exits non-zero on failure.

use tabviewer::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
