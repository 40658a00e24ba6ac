//! Document storage for evstats
//!
//! Holds the stored vehicle collection. On disk this is an append-only
//! file of checksummed frames with no in-place updates and no deletes.
//!
//! # Design Principles
//!
//! - Append-only, one fsync per batch
//! - Checksum-verified on every read; corruption is fatal
//! - Batch-atomic at best, never run-atomic
//! - Results in insertion order

mod checksum;
mod errors;
mod predicate;
mod reader;
mod record;
mod store;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use predicate::{FilterOp, Predicate, PredicateFilter};
pub use reader::StorageReader;
pub use record::DocumentRecord;
pub use store::{FileStore, MemoryStore, VehicleStore};
pub use writer::StorageWriter;
