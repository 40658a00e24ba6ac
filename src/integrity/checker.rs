//! Fail-fast integrity sweep

use serde::Serialize;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::storage::VehicleStore;

use super::errors::{IntegrityError, IntegrityResult};
use super::probes::Probe;

/// Outcome of a clean sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub documents_scanned: u64,
    /// Probe names in execution order
    pub probes_passed: Vec<&'static str>,
}

/// Read-only sweep over the stored collection.
///
/// Probes run in a fixed order and the first violation stops the sweep.
/// Running it never changes the store, so repeated runs agree.
pub struct IntegrityChecker<'a, S: VehicleStore> {
    store: &'a S,
}

impl<'a, S: VehicleStore> IntegrityChecker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs every probe.
    ///
    /// # Errors
    ///
    /// `EV_INTEGRITY_VIOLATION` naming the first failed probe, or
    /// `EV_INTEGRITY_SCAN_FAILED` if the store cannot be read.
    pub fn check_all(&self) -> IntegrityResult<IntegrityReport> {
        log_event_with_fields(Event::IntegrityCheckBegin, &[]);

        let mut report = IntegrityReport {
            documents_scanned: 0,
            probes_passed: Vec::with_capacity(Probe::ALL.len()),
        };

        for probe in Probe::ALL {
            match self.run_probe(probe) {
                Ok(scanned) => {
                    report.documents_scanned = scanned;
                    report.probes_passed.push(probe.name());
                    log_event_with_fields(Event::IntegrityProbePassed, &[("probe", probe.name())]);
                }
                Err(e) => {
                    let fields = [("probe", probe.name()), ("reason", e.message())];
                    if e.is_fatal() {
                        Logger::fatal(Event::IntegrityCheckFailed.as_str(), &fields);
                    } else {
                        log_event_with_fields(Event::IntegrityCheckFailed, &fields);
                    }
                    return Err(e);
                }
            }
        }

        log_event_with_fields(
            Event::IntegrityCheckPassed,
            &[("documents", &report.documents_scanned.to_string())],
        );
        Ok(report)
    }

    /// Runs one probe, returning the number of documents it read
    pub fn run_probe(&self, probe: Probe) -> IntegrityResult<u64> {
        let documents = self
            .store
            .find(&[])
            .map_err(|e| IntegrityError::scan_failed(probe.name(), e))?;

        match documents.iter().position(|doc| probe.violated_by(doc)) {
            Some(position) => Err(IntegrityError::violation(
                probe.name(),
                probe.description(),
                position,
            )),
            None => Ok(documents.len() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::IntegrityErrorCode;
    use crate::storage::{MemoryStore, Predicate, StorageError, StorageResult};
    use serde_json::{json, Value};

    /// Store whose every read hits a corrupt frame
    struct CorruptStore;

    impl VehicleStore for CorruptStore {
        fn append_batch(&mut self, documents: &[Value]) -> StorageResult<usize> {
            Ok(documents.len())
        }

        fn find(&self, _predicates: &[Predicate]) -> StorageResult<Vec<Value>> {
            Err(StorageError::data_corruption("checksum mismatch"))
        }

        fn count(&self, _predicates: &[Predicate]) -> StorageResult<usize> {
            Err(StorageError::data_corruption("checksum mismatch"))
        }

        fn create_indexes(&mut self, _fields: &[&str]) -> StorageResult<()> {
            Ok(())
        }
    }

    fn doc(vin: &str) -> serde_json::Value {
        json!({
            "vin": vin,
            "make": "ACME",
            "model": "X",
            "model_year": 2020,
            "electric_range": 100,
            "cafv_eligible": true,
        })
    }

    #[test]
    fn test_clean_store_passes_all_probes() {
        let mut store = MemoryStore::new();
        store.append_batch(&[doc("A"), doc("B")]).unwrap();

        let report = IntegrityChecker::new(&store).check_all().unwrap();
        assert_eq!(report.documents_scanned, 2);
        assert_eq!(
            report.probes_passed,
            vec![
                "model_year_integer",
                "electric_range_integer_or_null",
                "cafv_eligible_boolean",
                "vin_present",
            ]
        );
    }

    #[test]
    fn test_empty_store_passes() {
        let store = MemoryStore::new();
        let report = IntegrityChecker::new(&store).check_all().unwrap();
        assert_eq!(report.documents_scanned, 0);
        assert_eq!(report.probes_passed.len(), 4);
    }

    #[test]
    fn test_first_violated_probe_is_reported() {
        let mut bad = doc("");
        bad["cafv_eligible"] = json!("yes");

        let mut store = MemoryStore::new();
        store.append_batch(&[doc("A"), bad]).unwrap();

        let err = IntegrityChecker::new(&store).check_all().unwrap_err();
        // cafv probe runs before the vin probe
        assert_eq!(err.probe(), Some("cafv_eligible_boolean"));
        assert_eq!(err.position(), Some(1));
    }

    #[test]
    fn test_repeated_runs_agree() {
        let mut bad = doc("A");
        bad["electric_range"] = json!("n/a");

        let mut store = MemoryStore::new();
        store.append_batch(&[doc("B"), bad]).unwrap();

        let checker = IntegrityChecker::new(&store);
        let first = checker.check_all().unwrap_err().to_string();
        let second = checker.check_all().unwrap_err().to_string();
        assert_eq!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_corrupt_store_stops_at_first_probe() {
        let err = IntegrityChecker::new(&CorruptStore).check_all().unwrap_err();
        assert_eq!(err.code(), IntegrityErrorCode::EvIntegrityScanFailed);
        assert_eq!(err.probe(), Some("model_year_integer"));
        assert!(err.is_fatal());
    }
}
