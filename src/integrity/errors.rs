//! Integrity checker error types
//!
//! Error codes:
//! - EV_INTEGRITY_VIOLATION (ERROR): a probe found an offending document
//! - EV_INTEGRITY_SCAN_FAILED (ERROR, or FATAL on storage corruption)

use std::fmt;

use crate::storage::{Severity, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityErrorCode {
    EvIntegrityViolation,
    EvIntegrityScanFailed,
}

impl IntegrityErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IntegrityErrorCode::EvIntegrityViolation => "EV_INTEGRITY_VIOLATION",
            IntegrityErrorCode::EvIntegrityScanFailed => "EV_INTEGRITY_SCAN_FAILED",
        }
    }
}

impl fmt::Display for IntegrityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Integrity error naming the violated probe
#[derive(Debug)]
pub struct IntegrityError {
    code: IntegrityErrorCode,
    message: String,
    probe: Option<&'static str>,
    /// Store position of the first offending document
    position: Option<usize>,
    source: Option<StorageError>,
}

impl IntegrityError {
    pub fn violation(probe: &'static str, description: &str, position: usize) -> Self {
        Self {
            code: IntegrityErrorCode::EvIntegrityViolation,
            message: format!("{} (first at document {})", description, position),
            probe: Some(probe),
            position: Some(position),
            source: None,
        }
    }

    pub fn scan_failed(probe: &'static str, source: StorageError) -> Self {
        Self {
            code: IntegrityErrorCode::EvIntegrityScanFailed,
            message: format!("Store read failed during probe {}", probe),
            probe: Some(probe),
            position: None,
            source: Some(source),
        }
    }

    pub fn code(&self) -> IntegrityErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the probe that failed
    pub fn probe(&self) -> Option<&'static str> {
        self.probe
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn severity(&self) -> Severity {
        match &self.source {
            Some(source) => source.severity(),
            None => Severity::Error,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        if let Some(probe) = self.probe {
            write!(f, " [probe {}]", probe)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for IntegrityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

pub type IntegrityResult<T> = Result<T, IntegrityError>;
