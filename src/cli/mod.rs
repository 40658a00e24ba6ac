//! CLI module for evstats
//!
//! Thin adapter over the library: maps arguments to loader, engine and
//! checker calls and serializes their results as JSON on stdout.

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, load, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
