//! Query result shapes
//!
//! All results are plain derivations, owned by the caller and serialized
//! as-is by the outer surface.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vehicle::Vehicle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakeCount {
    pub make: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EligibilityCounts {
    pub eligible: u64,
    pub ineligible: u64,
}

/// Collection-wide statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_vehicles: u64,
    /// Count per vehicle type; a missing type is counted under `UNKNOWN`
    pub vehicles_by_type: BTreeMap<String, u64>,
    /// Makes by count descending, ties in store order
    pub top_makes: Vec<MakeCount>,
    /// 0.0 when no record has a range
    pub average_electric_range: f64,
    pub cafv_eligibility: EligibilityCounts,
}

/// One page of a filtered, sorted listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePage {
    /// Size of the full filtered set
    pub total: u64,
    pub page: usize,
    pub page_size: usize,
    pub results: Vec<Vehicle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStats {
    pub model: String,
    pub count: u64,
    pub avg_electric_range: Option<f64>,
}

/// Per-model breakdown of one make
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakeModels {
    pub make: String,
    /// Models by count descending
    pub models: Vec<ModelStats>,
    /// `None` when the make has no records
    pub most_popular_model: Option<String>,
}

/// Statistics of one model year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTrend {
    pub model_year: i64,
    pub total_count: u64,
    pub avg_electric_range: Option<f64>,
    pub bev_count: u64,
    pub phev_count: u64,
}

/// One group of an `analyze` result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeGroup {
    pub group: String,
    pub count: u64,
    /// Mean of the per-model mean ranges
    pub avg_electric_range: Option<f64>,
    /// Second-ranked model by count; `None` with fewer than two models
    pub most_common_vehicle: Option<String>,
}
