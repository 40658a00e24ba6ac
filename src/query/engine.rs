//! Aggregation query engine
//!
//! Every operation is a read over the store: fetch the matching documents,
//! decode them, reduce in one pass. Nothing is cached between calls.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::storage::{Predicate, VehicleStore};
use crate::vehicle::{fields, Vehicle, BEV_TYPE, UNKNOWN_KEY};

use super::aggregate::{Grouped, Mean};
use super::errors::{QueryError, QueryResult};
use super::request::{
    AnalyzeFilters, AnalyzeRequest, CountyQuery, GroupBy, SortField, SortOrder, VehicleClass,
};
use super::result::{
    AnalyzeGroup, EligibilityCounts, MakeCount, MakeModels, ModelStats, Summary, VehiclePage,
    YearTrend,
};
use super::sorter::VehicleSorter;

/// Number of makes reported by `summary` unless configured otherwise.
pub const DEFAULT_TOP_MAKES: usize = 10;

/// Largest page `county_listing` accepts unless configured otherwise.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Default)]
struct ModelAcc {
    count: u64,
    range: Mean,
}

#[derive(Debug, Default)]
struct YearAcc {
    count: u64,
    range: Mean,
    bev: u64,
    phev: u64,
}

#[derive(Debug, Default)]
struct GroupAcc {
    count: u64,
    model_means: Mean,
    models: Vec<(String, u64)>,
}

/// Read-only statistics over a vehicle store
pub struct QueryEngine<'a, S: VehicleStore> {
    store: &'a S,
    top_makes_limit: usize,
    max_page_size: usize,
}

impl<'a, S: VehicleStore> QueryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            top_makes_limit: DEFAULT_TOP_MAKES,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_top_makes_limit(mut self, limit: usize) -> Self {
        self.top_makes_limit = limit;
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Collection-wide counts, top makes, mean range and eligibility split.
    ///
    /// An empty store yields zeros and empty collections.
    pub fn summary(&self) -> QueryResult<Summary> {
        let vehicles = self.fetch("summary", &[])?;

        let mut by_type: BTreeMap<String, u64> = BTreeMap::new();
        let mut makes: Grouped<String, u64> = Grouped::new();
        let mut range = Mean::default();
        let mut eligibility = EligibilityCounts::default();

        for vehicle in &vehicles {
            let type_key = vehicle
                .vehicle_type
                .clone()
                .unwrap_or_else(|| UNKNOWN_KEY.to_string());
            *by_type.entry(type_key).or_insert(0) += 1;
            *makes.entry(vehicle.make.clone()) += 1;
            range.add_opt(vehicle.electric_range.map(|r| r as f64));

            if vehicle.cafv_eligible {
                eligibility.eligible += 1;
            } else {
                eligibility.ineligible += 1;
            }
        }

        let mut top_makes: Vec<MakeCount> = makes
            .into_entries()
            .into_iter()
            .map(|(make, count)| MakeCount { make, count })
            .collect();
        top_makes.sort_by(|a, b| b.count.cmp(&a.count));
        top_makes.truncate(self.top_makes_limit);

        self.complete("summary", vehicles.len());

        Ok(Summary {
            total_vehicles: vehicles.len() as u64,
            vehicles_by_type: by_type,
            top_makes,
            average_electric_range: range.rounded().unwrap_or(0.0),
            cafv_eligibility: eligibility,
        })
    }

    /// One page of the vehicles registered in a county.
    ///
    /// `total` is the store's count of matching documents over the whole
    /// filtered set.
    ///
    /// # Errors
    ///
    /// `EV_INVALID_ARGUMENT` for an empty county, `page < 1`, a page size
    /// outside `1..=max_page_size`, or a sort field or order outside the
    /// allow-list.
    pub fn county_listing(&self, query: &CountyQuery) -> QueryResult<VehiclePage> {
        let (county, field, order) = self
            .validate_listing(query)
            .map_err(|e| self.rejected("county_listing", e))?;

        let mut predicates = vec![Predicate::eq(fields::COUNTY, Value::String(county))];
        if let Some(year) = query.model_year {
            predicates.push(Predicate::eq(fields::MODEL_YEAR, Value::from(year)));
        }

        let mut vehicles = self.fetch("county_listing", &predicates)?;
        let total = self.store.count(&predicates)?;
        VehicleSorter::sort(&mut vehicles, field, order);

        let offset = (query.page - 1).saturating_mul(query.page_size);
        let results: Vec<Vehicle> = vehicles
            .into_iter()
            .skip(offset)
            .take(query.page_size)
            .collect();

        self.complete("county_listing", total);

        Ok(VehiclePage {
            total: total as u64,
            page: query.page,
            page_size: query.page_size,
            results,
        })
    }

    fn validate_listing(&self, query: &CountyQuery) -> QueryResult<(String, SortField, SortOrder)> {
        let county = normalize_key(&query.county)
            .ok_or_else(|| QueryError::invalid_argument("county must not be empty"))?;

        if query.page < 1 {
            return Err(QueryError::invalid_argument("page must be at least 1"));
        }
        if query.page_size < 1 || query.page_size > self.max_page_size {
            return Err(QueryError::invalid_argument(format!(
                "page_size must be between 1 and {}",
                self.max_page_size
            )));
        }

        let field: SortField = query.sort_by.parse()?;
        let order: SortOrder = query.sort_order.parse()?;
        Ok((county, field, order))
    }

    /// Per-model counts and mean range for one make.
    ///
    /// An unknown make yields an empty model list, not an error.
    pub fn models_by_make(&self, make: &str) -> QueryResult<MakeModels> {
        let make = normalize_key(make).ok_or_else(|| {
            self.rejected(
                "models_by_make",
                QueryError::invalid_argument("make must not be empty"),
            )
        })?;

        let vehicles = self.fetch(
            "models_by_make",
            &[Predicate::eq(fields::MAKE, Value::String(make.clone()))],
        )?;

        let mut by_model: Grouped<String, ModelAcc> = Grouped::new();
        for vehicle in &vehicles {
            let acc = by_model.entry(vehicle.model.clone());
            acc.count += 1;
            acc.range.add_opt(vehicle.electric_range.map(|r| r as f64));
        }

        let mut models: Vec<ModelStats> = by_model
            .into_entries()
            .into_iter()
            .map(|(model, acc)| ModelStats {
                model,
                count: acc.count,
                avg_electric_range: acc.range.rounded(),
            })
            .collect();
        models.sort_by(|a, b| b.count.cmp(&a.count));

        self.complete("models_by_make", vehicles.len());

        Ok(MakeModels {
            most_popular_model: models.first().map(|m| m.model.clone()),
            make,
            models,
        })
    }

    /// Per-model-year counts, mean range and BEV/PHEV split, oldest first.
    pub fn trends(&self) -> QueryResult<Vec<YearTrend>> {
        let vehicles = self.fetch("trends", &[])?;

        let mut by_year: BTreeMap<i64, YearAcc> = BTreeMap::new();
        for vehicle in &vehicles {
            let acc = by_year.entry(vehicle.model_year).or_default();
            acc.count += 1;
            acc.range.add_opt(vehicle.electric_range.map(|r| r as f64));
            if vehicle.is_bev() {
                acc.bev += 1;
            } else if vehicle.is_phev() {
                acc.phev += 1;
            }
        }

        self.complete("trends", vehicles.len());

        Ok(by_year
            .into_iter()
            .map(|(model_year, acc)| YearTrend {
                model_year,
                total_count: acc.count,
                avg_electric_range: acc.range.rounded(),
                bev_count: acc.bev,
                phev_count: acc.phev,
            })
            .collect())
    }

    /// Mean electric range of battery electric vehicles, 0.0 when none.
    pub fn bev_average_range(&self) -> QueryResult<f64> {
        let vehicles = self.fetch(
            "bev_average_range",
            &[Predicate::eq(fields::VEHICLE_TYPE, Value::from(BEV_TYPE))],
        )?;

        let mut range = Mean::default();
        for vehicle in &vehicles {
            range.add_opt(vehicle.electric_range.map(|r| r as f64));
        }

        self.complete("bev_average_range", vehicles.len());
        Ok(range.rounded().unwrap_or(0.0))
    }

    /// Runs an `analyze` request
    pub fn analyze_request(&self, request: &AnalyzeRequest) -> QueryResult<Vec<AnalyzeGroup>> {
        self.analyze(request.filters.as_ref(), &request.group_by)
    }

    /// Filters, then groups by `group_by` and ranks the groups by count.
    ///
    /// Records are first reduced per (group, model) pair, then per group.
    /// A group's mean range is the mean of its per-model means, and its
    /// most common vehicle is the model ranked second by count after a
    /// stable sort, or `None` when the group has fewer than two models.
    ///
    /// # Errors
    ///
    /// `EV_INVALID_ARGUMENT` for an unknown grouping dimension or vehicle
    /// type.
    pub fn analyze(
        &self,
        filters: Option<&AnalyzeFilters>,
        group_by: &str,
    ) -> QueryResult<Vec<AnalyzeGroup>> {
        let dimension = group_by
            .parse::<GroupBy>()
            .map_err(|e| self.rejected("analyze", e))?;
        let predicates = match filters {
            Some(filters) => analyze_predicates(filters).map_err(|e| self.rejected("analyze", e))?,
            None => Vec::new(),
        };

        let vehicles = self.fetch("analyze", &predicates)?;

        let mut pairs: Grouped<(String, String), ModelAcc> = Grouped::new();
        for vehicle in &vehicles {
            let acc = pairs.entry((group_key(vehicle, dimension), vehicle.model.clone()));
            acc.count += 1;
            acc.range.add_opt(vehicle.electric_range.map(|r| r as f64));
        }

        let mut groups: Grouped<String, GroupAcc> = Grouped::new();
        for ((key, model), pair) in pairs.into_entries() {
            let group = groups.entry(key);
            group.count += pair.count;
            group.model_means.add_opt(pair.range.value());
            group.models.push((model, pair.count));
        }

        let mut results: Vec<AnalyzeGroup> = groups
            .into_entries()
            .into_iter()
            .map(|(group, mut acc)| {
                acc.models.sort_by(|a, b| b.1.cmp(&a.1));
                AnalyzeGroup {
                    group,
                    count: acc.count,
                    avg_electric_range: acc.model_means.rounded(),
                    most_common_vehicle: acc.models.get(1).map(|(model, _)| model.clone()),
                }
            })
            .collect();
        results.sort_by(|a, b| b.count.cmp(&a.count));

        self.complete("analyze", vehicles.len());
        Ok(results)
    }

    /// Matching documents decoded in store order. Documents that do not
    /// decode are skipped and reported once per query.
    fn fetch(&self, query: &str, predicates: &[Predicate]) -> QueryResult<Vec<Vehicle>> {
        let documents = self.store.find(predicates)?;

        let mut skipped = 0usize;
        let vehicles: Vec<Vehicle> = documents
            .iter()
            .filter_map(|doc| {
                let decoded = Vehicle::from_document(doc);
                if decoded.is_none() {
                    skipped += 1;
                }
                decoded
            })
            .collect();

        if skipped > 0 {
            Logger::warn(
                Event::DocumentSkipped.as_str(),
                &[("query", query), ("skipped", &skipped.to_string())],
            );
        }

        Ok(vehicles)
    }

    fn complete(&self, query: &str, matched: usize) {
        log_event_with_fields(
            Event::QueryComplete,
            &[("query", query), ("matched", &matched.to_string())],
        );
    }

    fn rejected(&self, query: &str, err: QueryError) -> QueryError {
        log_event_with_fields(
            Event::QueryRejected,
            &[("query", query), ("reason", err.message())],
        );
        err
    }
}

/// Normalized lookup key, matching how the normalizer stores text
fn normalize_key(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

fn analyze_predicates(filters: &AnalyzeFilters) -> QueryResult<Vec<Predicate>> {
    let mut predicates = Vec::new();

    if let Some(makes) = filters.makes.as_ref().filter(|m| !m.is_empty()) {
        let values = makes
            .iter()
            .map(|m| Value::String(m.trim().to_uppercase()))
            .collect();
        predicates.push(Predicate::is_in(fields::MAKE, values));
    }

    if let Some(years) = filters.model_years {
        predicates.push(Predicate::gte(fields::MODEL_YEAR, Value::from(years.start)));
        predicates.push(Predicate::lte(fields::MODEL_YEAR, Value::from(years.end)));
    }

    if let Some(min_range) = filters.min_electric_range {
        predicates.push(Predicate::gte(fields::ELECTRIC_RANGE, Value::from(min_range)));
    }

    if let Some(ref vehicle_type) = filters.vehicle_type {
        let class: VehicleClass = vehicle_type.parse()?;
        predicates.push(Predicate::eq(fields::VEHICLE_TYPE, Value::from(class.type_name())));
    }

    Ok(predicates)
}

fn group_key(vehicle: &Vehicle, dimension: GroupBy) -> String {
    match dimension {
        GroupBy::County => vehicle
            .county
            .clone()
            .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
        GroupBy::Make => vehicle.make.clone(),
        GroupBy::ModelYear => vehicle.model_year.to_string(),
    }
}
