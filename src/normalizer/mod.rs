//! Record normalizer for evstats
//!
//! Converts one raw input row into a canonical `Vehicle` or rejects it.
//!
//! # Rules
//!
//! - Strings are trimmed; empty or all-whitespace values are absent;
//!   present values are upper-cased.
//! - Integers that fail to parse are absent, not errors.
//! - A row is admitted only when `vin`, `make`, `model` and `model_year`
//!   are all present. Rejected rows never produce a partial record.
//! - Eligibility is binary: exact match against the eligibility sentinel.
//!
//! Normalization is pure and deterministic.

mod normalizer;
mod rejection;
mod row;

pub use normalizer::{normalize, normalize_text, parse_int};
pub use rejection::Rejection;
pub use row::{columns, RawRow};
