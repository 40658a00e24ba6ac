//! Integrity checker for evstats
//!
//! A diagnostic, not a gate: it reports the first stored document that
//! breaks a shape invariant and never blocks loads or queries.
//!
//! Probes, in order:
//! 1. `model_year` is an integer
//! 2. `electric_range` is an integer or null
//! 3. `cafv_eligible` is a boolean
//! 4. `vin` is present and non-empty

mod checker;
mod errors;
mod probes;

pub use checker::{IntegrityChecker, IntegrityReport};
pub use errors::{IntegrityError, IntegrityErrorCode, IntegrityResult};
pub use probes::Probe;
