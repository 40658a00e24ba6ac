//! Reducers shared by the aggregate queries

use std::collections::HashMap;
use std::hash::Hash;

/// Rounds to two decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Running mean that ignores absent values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn add_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.add(v);
        }
    }

    /// Number of values averaged
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The mean, or `None` when nothing was added
    pub fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// The mean rounded to two decimals
    pub fn rounded(&self) -> Option<f64> {
        self.value().map(round2)
    }
}

/// Keyed accumulators kept in first-seen key order.
///
/// Iteration order is the order in which each key was first accumulated,
/// so stable sorts over the entries break ties by store order.
#[derive(Debug)]
pub struct Grouped<K, A> {
    slots: HashMap<K, usize>,
    entries: Vec<(K, A)>,
}

impl<K, A> Default for Grouped<K, A> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, A: Default> Grouped<K, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulator for `key`, created on first use
    pub fn entry(&mut self, key: K) -> &mut A {
        let index = match self.slots.get(&key) {
            Some(&index) => index,
            None => {
                let index = self.entries.len();
                self.slots.insert(key.clone(), index);
                self.entries.push((key, A::default()));
                index
            }
        };
        &mut self.entries[index].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(K, A)> {
        self.entries
    }
}
