//! Bulk loader for evstats
//!
//! Streams raw rows through the normalizer and appends admitted records
//! to the store in fixed-size batches, then creates the secondary indexes.
//!
//! # Guarantees
//!
//! - `inserted + dropped` equals the number of rows read
//! - Stored records appear in source order
//! - Memory use is bounded by the batch size
//! - A failed batch stops the run; earlier batches stay stored

mod csv_source;
mod errors;
mod loader;

pub use csv_source::CsvSource;
pub use errors::{LoaderError, LoaderErrorCode, LoaderResult};
pub use loader::{BulkLoader, LoadSummary, DEFAULT_BATCH_SIZE};
