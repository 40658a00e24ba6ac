//! Batched loading of raw rows into a vehicle store

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::normalizer::{normalize, RawRow, Rejection};
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope};
use crate::storage::VehicleStore;
use crate::vehicle::{fields, Vehicle};

use super::csv_source::CsvSource;
use super::errors::{LoaderError, LoaderResult};

/// Rows per storage batch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// Outcome of one load run
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    /// Identifier of this run, repeated on every log line it produces
    pub run_id: Uuid,
    /// Records appended to the store
    pub inserted: u64,
    /// Rows rejected by the admission gate or unreadable in the source
    pub dropped: u64,
    /// Storage batches written
    pub batches: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Progress {
    rows: u64,
    inserted: u64,
    dropped: u64,
    batches: u64,
}

/// Streams rows into a store in fixed-size batches.
///
/// Loading is not idempotent: running the same source twice stores every
/// admitted record twice.
pub struct BulkLoader<'s, S: VehicleStore> {
    store: &'s mut S,
    batch_size: usize,
}

impl<'s, S: VehicleStore> BulkLoader<'s, S> {
    /// Creates a loader with the default batch size
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the batch size. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Returns the configured batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Loads rows from any in-memory or streaming source
    pub fn load<I>(&mut self, rows: I) -> LoaderResult<LoadSummary>
    where
        I: IntoIterator<Item = RawRow>,
    {
        self.run(rows.into_iter().map(Ok::<RawRow, csv::Error>))
    }

    /// Loads rows from a headered CSV file
    ///
    /// # Errors
    ///
    /// `EV_LOAD_SOURCE_NOT_FOUND` when the file does not exist, and
    /// `EV_LOAD_SOURCE_UNREADABLE` when it cannot be read. A single
    /// malformed record is counted as dropped instead.
    pub fn load_path(&mut self, path: &Path) -> LoaderResult<LoadSummary> {
        let source = CsvSource::open(path)?;
        self.run(source)
    }

    fn run<I>(&mut self, rows: I) -> LoaderResult<LoadSummary>
    where
        I: Iterator<Item = Result<RawRow, csv::Error>>,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let run_id_str = run_id.to_string();
        let batch_size_str = self.batch_size.to_string();
        let scope = ObservationScope::with_fields(
            "LOAD",
            &[("run_id", &run_id_str), ("batch_size", &batch_size_str)],
        );

        let mut progress = Progress::default();
        if let Err(e) = self.ingest(rows, &mut progress) {
            scope.fail(&e.to_string());
            return Err(e);
        }

        if let Err(e) = self.store.create_indexes(&fields::INDEXED) {
            let err = LoaderError::index_failed(progress.inserted, e);
            scope.fail(&err.to_string());
            return Err(err);
        }
        log_event_with_fields(
            Event::IndexBuildComplete,
            &[("run_id", &run_id_str), ("fields", &fields::INDEXED.join(","))],
        );

        scope.complete_with_fields(&[
            ("rows", &progress.rows.to_string()),
            ("inserted", &progress.inserted.to_string()),
            ("dropped", &progress.dropped.to_string()),
            ("batches", &progress.batches.to_string()),
        ]);

        Ok(LoadSummary {
            run_id,
            inserted: progress.inserted,
            dropped: progress.dropped,
            batches: progress.batches,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn ingest<I>(&mut self, rows: I, progress: &mut Progress) -> LoaderResult<()>
    where
        I: Iterator<Item = Result<RawRow, csv::Error>>,
    {
        let mut batch: Vec<Vehicle> = Vec::with_capacity(self.batch_size);

        for item in rows {
            progress.rows += 1;

            let admitted = match item {
                Ok(row) => normalize(&row),
                Err(e) if e.is_io_error() => {
                    return Err(LoaderError::source_unreadable(
                        e.to_string(),
                        progress.inserted,
                    ));
                }
                Err(_) => Err(Rejection::Unreadable),
            };

            match admitted {
                Ok(vehicle) => batch.push(vehicle),
                Err(rejection) => {
                    progress.dropped += 1;
                    Logger::trace(
                        Event::RowRejected.as_str(),
                        &[
                            ("row", &progress.rows.to_string()),
                            ("reason", rejection.as_str()),
                        ],
                    );
                }
            }

            if batch.len() >= self.batch_size {
                self.flush(&mut batch, progress)?;
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, progress)?;
        }

        Ok(())
    }

    fn flush(&mut self, batch: &mut Vec<Vehicle>, progress: &mut Progress) -> LoaderResult<()> {
        let batch_number = progress.batches + 1;

        let written = self
            .store
            .insert_vehicles(batch)
            .map_err(|e| LoaderError::write_failed(batch_number, progress.inserted, e))?;

        progress.batches = batch_number;
        progress.inserted += written as u64;
        batch.clear();

        log_event_with_fields(
            Event::LoadBatchFlushed,
            &[
                ("batch", &batch_number.to_string()),
                ("rows", &written.to_string()),
                ("inserted", &progress.inserted.to_string()),
            ],
        );

        Ok(())
    }
}
