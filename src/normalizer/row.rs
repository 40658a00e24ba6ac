//! Raw input rows

use std::collections::HashMap;

/// Source column names of the EV population dataset.
pub mod columns {
    pub const VIN: &str = "VIN (1-10)";
    pub const COUNTY: &str = "County";
    pub const STATE: &str = "State";
    pub const MAKE: &str = "Make";
    pub const MODEL: &str = "Model";
    pub const MODEL_YEAR: &str = "Model Year";
    pub const VEHICLE_TYPE: &str = "Electric Vehicle Type";
    pub const ELECTRIC_RANGE: &str = "Electric Range";
    pub const CAFV_ELIGIBILITY: &str = "Clean Alternative Fuel Vehicle (CAFV) Eligibility";
}

/// One raw row: column name to optional text value.
///
/// A column that is missing from the row and a column holding `None` are
/// treated identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    values: HashMap<String, Option<String>>,
}

impl RawRow {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from `(column, value)` pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect();
        Self { values }
    }

    /// Sets a column value, returning the row for chaining
    pub fn with(mut self, column: &str, value: Option<&str>) -> Self {
        self.insert(column, value.map(str::to_string));
        self
    }

    /// Sets a column value
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.values.insert(column.into(), value);
    }

    /// Returns the text of a column, if present
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(|v| v.as_deref())
    }
}
