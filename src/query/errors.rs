//! Query engine error types
//!
//! Error codes:
//! - EV_INVALID_ARGUMENT (ERROR): caller input was rejected
//! - EV_QUERY_FAILED (ERROR, or FATAL when the store reports corruption)
//!
//! A filter that matches nothing is not an error.

use std::fmt;

use crate::storage::{Severity, StorageError};

/// Query-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Unrecognized sort field, grouping dimension or bad bounds
    EvInvalidArgument,
    /// The store failed while answering
    EvQueryFailed,
}

impl QueryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::EvInvalidArgument => "EV_INVALID_ARGUMENT",
            QueryErrorCode::EvQueryFailed => "EV_QUERY_FAILED",
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with context
#[derive(Debug)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
    details: Option<String>,
    source: Option<StorageError>,
}

impl QueryError {
    /// Caller input was rejected
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::EvInvalidArgument,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Caller input was rejected, naming the accepted values
    pub fn invalid_choice(what: &str, got: &str, allowed: &[&str]) -> Self {
        Self {
            code: QueryErrorCode::EvInvalidArgument,
            message: format!("Invalid {}: '{}'", what, got),
            details: Some(format!("expected one of: {}", allowed.join(", "))),
            source: None,
        }
    }

    /// The store failed
    pub fn query_failed(source: StorageError) -> Self {
        Self {
            code: QueryErrorCode::EvQueryFailed,
            message: "Store failed while answering query".to_string(),
            details: None,
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the error details if any
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this is a caller input error
    pub fn is_invalid_argument(&self) -> bool {
        self.code == QueryErrorCode::EvInvalidArgument
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match &self.source {
            Some(source) => source.severity(),
            None => Severity::Error,
        }
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<StorageError> for QueryError {
    fn from(err: StorageError) -> Self {
        QueryError::query_failed(err)
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
