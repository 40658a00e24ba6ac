//! Query request types
//!
//! Parameters arrive as text from the outer surface and are parsed here.
//! Anything outside an allow-list is rejected, never coerced.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::vehicle::{BEV_TYPE, PHEV_TYPE};

use super::errors::QueryError;

/// Sortable fields of the county listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ModelYear,
    Make,
    Model,
}

impl SortField {
    pub const ALLOWED: [&'static str; 3] = ["model_year", "make", "model"];
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "model_year" => Ok(SortField::ModelYear),
            "make" => Ok(SortField::Make),
            "model" => Ok(SortField::Model),
            other => Err(QueryError::invalid_choice("sort field", other, &Self::ALLOWED)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(QueryError::invalid_choice("sort order", other, &["asc", "desc"])),
        }
    }
}

/// Grouping dimension of `analyze`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    County,
    Make,
    ModelYear,
}

impl GroupBy {
    pub const ALLOWED: [&'static str; 3] = ["county", "make", "model_year"];
}

impl FromStr for GroupBy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "county" => Ok(GroupBy::County),
            "make" => Ok(GroupBy::Make),
            "model_year" => Ok(GroupBy::ModelYear),
            other => Err(QueryError::invalid_choice("group_by", other, &Self::ALLOWED)),
        }
    }
}

/// Vehicle class accepted by the `vehicle_type` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Bev,
    Phev,
}

impl VehicleClass {
    /// The exact stored `vehicle_type` string of this class
    pub fn type_name(&self) -> &'static str {
        match self {
            VehicleClass::Bev => BEV_TYPE,
            VehicleClass::Phev => PHEV_TYPE,
        }
    }
}

impl FromStr for VehicleClass {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEV" => Ok(VehicleClass::Bev),
            "PHEV" => Ok(VehicleClass::Phev),
            other => Err(QueryError::invalid_choice("vehicle_type", other, &["BEV", "PHEV"])),
        }
    }
}

/// Parameters of the paginated county listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyQuery {
    pub county: String,
    pub page: usize,
    pub page_size: usize,
    pub model_year: Option<i64>,
    pub sort_by: String,
    pub sort_order: String,
}

impl CountyQuery {
    /// First page of 20, sorted by model year ascending
    pub fn new(county: impl Into<String>) -> Self {
        Self {
            county: county.into(),
            page: 1,
            page_size: 20,
            model_year: None,
            sort_by: "model_year".to_string(),
            sort_order: "asc".to_string(),
        }
    }

    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn model_year(mut self, model_year: i64) -> Self {
        self.model_year = Some(model_year);
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, sort_order: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self.sort_order = sort_order.into();
        self
    }
}

/// Inclusive model year range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i64,
    pub end: i64,
}

/// Optional conjunctive filters of `analyze`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeFilters {
    /// Make membership; an empty list does not filter
    #[serde(default)]
    pub makes: Option<Vec<String>>,
    #[serde(default)]
    pub model_years: Option<YearRange>,
    /// Inclusive lower bound; excludes records without a range
    #[serde(default)]
    pub min_electric_range: Option<i64>,
    /// "BEV" or "PHEV"
    #[serde(default)]
    pub vehicle_type: Option<String>,
}

/// Request body of `analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub filters: Option<AnalyzeFilters>,
    /// "county", "make" or "model_year"
    pub group_by: String,
}

impl AnalyzeRequest {
    pub fn new(group_by: impl Into<String>) -> Self {
        Self {
            filters: None,
            group_by: group_by.into(),
        }
    }

    pub fn with_filters(mut self, filters: AnalyzeFilters) -> Self {
        self.filters = Some(filters);
        self
    }
}
