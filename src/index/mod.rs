//! Secondary indexes for evstats
//!
//! In-memory, rebuilt from storage on open. Indexes only narrow the
//! candidate set for equality predicates; every candidate is still checked
//! against the full predicate list, so an index never changes a result.

mod btree;
mod manager;

pub use btree::{IndexKey, IndexTree, Position};
pub use manager::IndexManager;
