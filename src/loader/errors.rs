//! Loader error types
//!
//! Error codes:
//! - EV_LOAD_SOURCE_NOT_FOUND (ERROR)
//! - EV_LOAD_SOURCE_UNREADABLE (ERROR)
//! - EV_LOAD_WRITE_FAILED (ERROR, or FATAL when the store reports corruption)
//! - EV_LOAD_INDEX_FAILED (ERROR)
//!
//! Rejected rows are not errors; they are counted in the load summary.

use std::fmt;
use std::path::Path;

use crate::storage::{Severity, StorageError};

/// Loader-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderErrorCode {
    /// Source file does not exist
    EvLoadSourceNotFound,
    /// Source could not be read
    EvLoadSourceUnreadable,
    /// A batch could not be written; the run stopped there
    EvLoadWriteFailed,
    /// Index creation after the load failed
    EvLoadIndexFailed,
}

impl LoaderErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LoaderErrorCode::EvLoadSourceNotFound => "EV_LOAD_SOURCE_NOT_FOUND",
            LoaderErrorCode::EvLoadSourceUnreadable => "EV_LOAD_SOURCE_UNREADABLE",
            LoaderErrorCode::EvLoadWriteFailed => "EV_LOAD_WRITE_FAILED",
            LoaderErrorCode::EvLoadIndexFailed => "EV_LOAD_INDEX_FAILED",
        }
    }
}

impl fmt::Display for LoaderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Loader error with context
#[derive(Debug)]
pub struct LoaderError {
    code: LoaderErrorCode,
    message: String,
    /// Rows already persisted when the run stopped
    persisted: u64,
    source: Option<StorageError>,
}

impl LoaderError {
    /// Source file is missing
    pub fn source_not_found(path: &Path) -> Self {
        Self {
            code: LoaderErrorCode::EvLoadSourceNotFound,
            message: format!("Source not found: {}", path.display()),
            persisted: 0,
            source: None,
        }
    }

    /// Source could not be read after `persisted` rows were stored
    pub fn source_unreadable(reason: impl Into<String>, persisted: u64) -> Self {
        Self {
            code: LoaderErrorCode::EvLoadSourceUnreadable,
            message: reason.into(),
            persisted,
            source: None,
        }
    }

    /// Batch `batch` failed after `persisted` rows were stored
    pub fn write_failed(batch: u64, persisted: u64, source: StorageError) -> Self {
        Self {
            code: LoaderErrorCode::EvLoadWriteFailed,
            message: format!(
                "Batch {} failed; {} rows from earlier batches remain stored",
                batch, persisted
            ),
            persisted,
            source: Some(source),
        }
    }

    /// Index creation failed after all rows were stored
    pub fn index_failed(persisted: u64, source: StorageError) -> Self {
        Self {
            code: LoaderErrorCode::EvLoadIndexFailed,
            message: "Index creation failed after load".to_string(),
            persisted,
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> LoaderErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rows persisted before the failure. These are not rolled back.
    pub fn persisted(&self) -> u64 {
        self.persisted
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

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
