//! evstats - descriptive statistics over electric vehicle registrations
//!
//! Raw rows are normalized once at ingestion, appended in batches to an
//! append-only store and read by a stateless aggregation engine.

pub mod cli;
pub mod index;
pub mod integrity;
pub mod loader;
pub mod normalizer;
pub mod observability;
pub mod query;
pub mod storage;
pub mod vehicle;
