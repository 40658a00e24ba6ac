//! Listing sort
//!
//! Sorts decoded vehicles on one allow-listed field. The sort is stable:
//! records with equal keys keep store order in both directions.

use std::cmp::Ordering;

use crate::vehicle::Vehicle;

use super::request::{SortField, SortOrder};

/// Sorts vehicles for paginated listings
pub struct VehicleSorter;

impl VehicleSorter {
    pub fn sort(vehicles: &mut [Vehicle], field: SortField, order: SortOrder) {
        vehicles.sort_by(|a, b| {
            let ordering = Self::compare(a, b, field);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    fn compare(a: &Vehicle, b: &Vehicle, field: SortField) -> Ordering {
        match field {
            SortField::ModelYear => a.model_year.cmp(&b.model_year),
            SortField::Make => a.make.cmp(&b.make),
            SortField::Model => a.model.cmp(&b.model),
        }
    }
}
