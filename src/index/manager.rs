//! Index manager
//!
//! # API
//!
//! - `create(field, documents)` - Build an index on a field (idempotent)
//! - `apply_insert(document, position)` - Maintain indexes after an append
//! - `candidates(predicates)` - Positions answering an equality predicate

use std::collections::BTreeMap;

use serde_json::Value;

use crate::storage::{FilterOp, Predicate};

use super::btree::{IndexKey, IndexTree, Position};

/// Maintains one `IndexTree` per indexed field.
#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: BTreeMap<String, IndexTree>,
}

impl IndexManager {
    /// Creates a manager with no indexes
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a field is indexed
    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    /// Indexed field names, sorted
    pub fn fields(&self) -> Vec<String> {
        self.indexes.keys().cloned().collect()
    }

    /// Builds an index on `field` over `documents`.
    ///
    /// Returns false (and does nothing) when the field is already indexed.
    pub fn create(&mut self, field: &str, documents: &[Value]) -> bool {
        if self.is_indexed(field) {
            return false;
        }

        let mut tree = IndexTree::new();
        for (position, document) in documents.iter().enumerate() {
            if let Some(key) = document.get(field).and_then(IndexKey::from_json) {
                tree.insert(key, position);
            }
        }
        self.indexes.insert(field.to_string(), tree);
        true
    }

    /// Adds a newly appended document to every index.
    pub fn apply_insert(&mut self, document: &Value, position: Position) {
        for (field, tree) in self.indexes.iter_mut() {
            if let Some(key) = document.get(field).and_then(IndexKey::from_json) {
                tree.insert(key, position);
            }
        }
    }

    /// Candidate positions for the first equality predicate on an indexed
    /// field, ascending.
    ///
    /// Returns `None` when no predicate can use an index (full scan).
    pub fn candidates(&self, predicates: &[Predicate]) -> Option<Vec<Position>> {
        predicates.iter().find_map(|pred| {
            let tree = self.indexes.get(&pred.field)?;
            let values: Vec<&Value> = match &pred.op {
                FilterOp::Eq(v) => vec![v],
                FilterOp::In(vs) => vs.iter().collect(),
                _ => return None,
            };

            let mut positions: Vec<Position> = values
                .into_iter()
                .filter_map(IndexKey::from_json)
                .flat_map(|key| tree.lookup_eq(&key).to_vec())
                .collect();
            positions.sort_unstable();
            positions.dedup();
            Some(positions)
        })
    }
}
