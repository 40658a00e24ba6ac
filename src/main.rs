//! evstats CLI entry point
//!
//! Parses nothing and opens nothing itself. All logic is delegated to the
//! CLI module, which has already written the JSON error response when a
//! command fails.

use evstats::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
