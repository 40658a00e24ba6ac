//! Admission gate rejections
//!
//! A rejected row is dropped and counted by the loader. It is never a fault.

use thiserror::Error;

/// Reason a raw row failed the admission gate.
///
/// Fields are checked in a fixed order (`vin`, `make`, `model`,
/// `model_year`); the first missing one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// VIN absent or blank
    #[error("row rejected: missing vin")]
    MissingVin,

    /// Make absent or blank
    #[error("row rejected: missing make")]
    MissingMake,

    /// Model absent or blank
    #[error("row rejected: missing model")]
    MissingModel,

    /// Model year absent, unparsable or zero
    #[error("row rejected: missing or unparsable model_year")]
    MissingModelYear,

    /// The source record itself could not be decoded
    #[error("row rejected: unreadable source record")]
    Unreadable,
}

impl Rejection {
    /// Stable short name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::MissingVin => "missing_vin",
            Rejection::MissingMake => "missing_make",
            Rejection::MissingModel => "missing_model",
            Rejection::MissingModelYear => "missing_model_year",
            Rejection::Unreadable => "unreadable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        assert!(Rejection::MissingVin.to_string().contains("vin"));
        assert!(Rejection::MissingModelYear.to_string().contains("model_year"));
    }

    #[test]
    fn test_short_names_are_snake_case() {
        for r in [
            Rejection::MissingVin,
            Rejection::MissingMake,
            Rejection::MissingModel,
            Rejection::MissingModelYear,
            Rejection::Unreadable,
        ] {
            assert!(r.as_str().chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
