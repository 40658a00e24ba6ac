//! Vehicle record type and its stored document form

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Vehicle type string for battery electric vehicles.
pub const BEV_TYPE: &str = "BATTERY ELECTRIC VEHICLE (BEV)";

/// Vehicle type string for plug-in hybrids.
pub const PHEV_TYPE: &str = "PLUG-IN HYBRID ELECTRIC VEHICLE (PHEV)";

/// Normalized eligibility text that maps to `cafv_eligible = true`.
pub const ELIGIBLE_SENTINEL: &str = "CLEAN ALTERNATIVE FUEL VEHICLE ELIGIBLE";

/// Bucket name used when a grouping key is null.
pub const UNKNOWN_KEY: &str = "UNKNOWN";

/// Stored field names.
pub mod fields {
    pub const VIN: &str = "vin";
    pub const COUNTY: &str = "county";
    pub const STATE: &str = "state";
    pub const MAKE: &str = "make";
    pub const MODEL: &str = "model";
    pub const MODEL_YEAR: &str = "model_year";
    pub const VEHICLE_TYPE: &str = "vehicle_type";
    pub const ELECTRIC_RANGE: &str = "electric_range";
    pub const CAFV_ELIGIBLE: &str = "cafv_eligible";

    /// Fields indexed after every load.
    pub const INDEXED: [&str; 6] = [COUNTY, MAKE, MODEL, MODEL_YEAR, VEHICLE_TYPE, ELECTRIC_RANGE];
}

/// Canonical, post-normalization vehicle record.
///
/// String fields are trimmed and upper-cased. `electric_range` is either a
/// non-negative integer or absent. `cafv_eligible` is never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vin: String,
    pub county: Option<String>,
    pub state: Option<String>,
    pub make: String,
    pub model: String,
    pub model_year: i64,
    pub vehicle_type: Option<String>,
    pub electric_range: Option<i64>,
    pub cafv_eligible: bool,
}

impl Vehicle {
    /// Returns the stored document form of this record.
    ///
    /// Optional fields are written as explicit `null`s so that every stored
    /// document carries the full field set.
    pub fn to_document(&self) -> Value {
        serde_json::json!({
            fields::VIN: self.vin,
            fields::COUNTY: self.county,
            fields::STATE: self.state,
            fields::MAKE: self.make,
            fields::MODEL: self.model,
            fields::MODEL_YEAR: self.model_year,
            fields::VEHICLE_TYPE: self.vehicle_type,
            fields::ELECTRIC_RANGE: self.electric_range,
            fields::CAFV_ELIGIBLE: self.cafv_eligible,
        })
    }

    /// Decodes a stored document.
    ///
    /// Returns `None` when the document does not have the canonical shape.
    pub fn from_document(document: &Value) -> Option<Self> {
        serde_json::from_value(document.clone()).ok()
    }

    /// True when the record is a battery electric vehicle.
    pub fn is_bev(&self) -> bool {
        self.vehicle_type.as_deref() == Some(BEV_TYPE)
    }

    /// True when the record is a plug-in hybrid.
    pub fn is_phev(&self) -> bool {
        self.vehicle_type.as_deref() == Some(PHEV_TYPE)
    }
}
