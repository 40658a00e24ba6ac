//! BTreeMap-based index structures
//!
//! Positions within each key are kept sorted ascending, so lookups return
//! documents in insertion order.

use std::collections::BTreeMap;

use serde_json::Value;

/// Position of a document in its collection (insertion order)
pub type Position = usize;

/// Index key for a scalar field value.
///
/// Ordering is deterministic: Bool < Int < String.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// String value
    String(String),
}

impl IndexKey {
    /// Create a key from a JSON value.
    ///
    /// Null, floats, arrays and objects are not indexed.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(IndexKey::Bool(*b)),
            Value::Number(n) => n.as_i64().map(IndexKey::Int),
            Value::String(s) => Some(IndexKey::String(s.clone())),
            _ => None,
        }
    }
}

/// A single field index.
#[derive(Debug, Default)]
pub struct IndexTree {
    tree: BTreeMap<IndexKey, Vec<Position>>,
}

impl IndexTree {
    /// Creates a new empty index tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position for a key, keeping positions sorted.
    pub fn insert(&mut self, key: IndexKey, position: Position) {
        let positions = self.tree.entry(key).or_default();
        if let Err(at) = positions.binary_search(&position) {
            positions.insert(at, position);
        }
    }

    /// All positions for an exact key, ascending.
    pub fn lookup_eq(&self, key: &IndexKey) -> &[Position] {
        self.tree.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_ordering() {
        let keys = [
            IndexKey::Bool(false),
            IndexKey::Bool(true),
            IndexKey::Int(-1),
            IndexKey::Int(2020),
            IndexKey::String("KING".to_string()),
        ];
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_positions_sorted_and_deduplicated() {
        let mut tree = IndexTree::new();
        let key = IndexKey::String("TESLA".to_string());
        tree.insert(key.clone(), 30);
        tree.insert(key.clone(), 10);
        tree.insert(key.clone(), 20);
        tree.insert(key.clone(), 10);

        assert_eq!(tree.lookup_eq(&key), &[10, 20, 30]);
        assert_eq!(tree.key_count(), 1);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(IndexKey::from_json(&json!(2020)), Some(IndexKey::Int(2020)));
        assert_eq!(IndexKey::from_json(&json!(true)), Some(IndexKey::Bool(true)));
        assert_eq!(
            IndexKey::from_json(&json!("KING")),
            Some(IndexKey::String("KING".to_string()))
        );
        assert_eq!(IndexKey::from_json(&json!(null)), None);
        assert_eq!(IndexKey::from_json(&json!(1.5)), None);
    }
}
