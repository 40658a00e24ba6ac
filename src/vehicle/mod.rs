//! Canonical vehicle registration records
//!
//! A `Vehicle` is produced once by the normalizer, persisted once by the
//! loader and read many times by the query engine. Records are never
//! mutated after they are stored.

mod record;

pub use record::{fields, Vehicle, BEV_TYPE, ELIGIBLE_SENTINEL, PHEV_TYPE, UNKNOWN_KEY};
