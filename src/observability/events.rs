//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in evstats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Bootstrapping
    /// Configuration loaded
    ConfigLoaded,
    /// Store opened
    StoreOpened,

    // Loading
    /// Bulk load started
    LoadBegin,
    /// One batch persisted
    LoadBatchFlushed,
    /// Bulk load finished
    LoadComplete,
    /// Bulk load aborted
    LoadFailed,
    /// Row dropped by the admission gate
    RowRejected,
    /// Indexes created after a load
    IndexBuildComplete,

    // Queries
    /// Query answered
    QueryComplete,
    /// Query rejected as invalid input
    QueryRejected,
    /// Stored document skipped because it is not a canonical record
    DocumentSkipped,

    // Integrity
    /// Integrity sweep started
    IntegrityCheckBegin,
    /// One probe found no violation
    IntegrityProbePassed,
    /// All probes passed
    IntegrityCheckPassed,
    /// A probe found a violation
    IntegrityCheckFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",

            Event::LoadBegin => "LOAD_BEGIN",
            Event::LoadBatchFlushed => "LOAD_BATCH_FLUSHED",
            Event::LoadComplete => "LOAD_COMPLETE",
            Event::LoadFailed => "LOAD_FAILED",
            Event::RowRejected => "ROW_REJECTED",
            Event::IndexBuildComplete => "INDEX_BUILD_COMPLETE",

            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::DocumentSkipped => "DOCUMENT_SKIPPED",

            Event::IntegrityCheckBegin => "INTEGRITY_CHECK_BEGIN",
            Event::IntegrityProbePassed => "INTEGRITY_PROBE_PASSED",
            Event::IntegrityCheckPassed => "INTEGRITY_CHECK_PASSED",
            Event::IntegrityCheckFailed => "INTEGRITY_CHECK_FAILED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::LoadFailed | Event::QueryRejected | Event::IntegrityCheckFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::StoreOpened,
            Event::LoadBegin,
            Event::LoadBatchFlushed,
            Event::LoadComplete,
            Event::LoadFailed,
            Event::RowRejected,
            Event::IndexBuildComplete,
            Event::QueryComplete,
            Event::QueryRejected,
            Event::DocumentSkipped,
            Event::IntegrityCheckBegin,
            Event::IntegrityProbePassed,
            Event::IntegrityCheckPassed,
            Event::IntegrityCheckFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::LoadFailed.is_failure());
        assert!(Event::IntegrityCheckFailed.is_failure());
        assert!(!Event::LoadComplete.is_failure());
    }
}
