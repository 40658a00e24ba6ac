//! CLI-specific error types
//!
//! Failures of the library layers keep their own code (for example
//! `EV_LOAD_WRITE_FAILED`) when reported on stdout.

use std::fmt;
use std::io;

use crate::integrity::IntegrityError;
use crate::loader::LoaderError;
use crate::query::QueryError;
use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Data directory missing its layout
    NotInitialized,
    /// A library operation failed
    CommandFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "EV_CLI_CONFIG_ERROR",
            Self::IoError => "EV_CLI_IO_ERROR",
            Self::NotInitialized => "EV_CLI_NOT_INITIALIZED",
            Self::CommandFailed => "EV_CLI_COMMAND_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    /// Code of the underlying library error, if any
    origin: Option<&'static str>,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            origin: None,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Not initialized
    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'evstats init' first.",
        )
    }

    /// A library operation failed with its own code
    pub fn command_failed(origin: &'static str, msg: impl Into<String>) -> Self {
        Self {
            code: CliErrorCode::CommandFailed,
            origin: Some(origin),
            message: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Code reported to the caller: the library code when there is one
    pub fn code_str(&self) -> &'static str {
        self.origin.unwrap_or_else(|| self.code.code())
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message)
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

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::command_failed(e.code().code(), e.to_string())
    }
}

impl From<LoaderError> for CliError {
    fn from(e: LoaderError) -> Self {
        Self::command_failed(e.code().code(), e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::command_failed(e.code().code(), e.to_string())
    }
}

impl From<IntegrityError> for CliError {
    fn from(e: IntegrityError) -> Self {
        Self::command_failed(e.code().code(), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
