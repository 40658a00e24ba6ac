//! Shape probes over stored documents
//!
//! Each probe asks whether any stored document breaks one invariant the
//! query engine relies on.

use serde_json::Value;

use crate::vehicle::fields;

/// One existence probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// `model_year` is an integer
    ModelYearInteger,
    /// `electric_range` is an integer or null
    ElectricRangeIntegerOrNull,
    /// `cafv_eligible` is a boolean
    CafvEligibleBoolean,
    /// `vin` is present and non-empty
    VinPresent,
}

impl Probe {
    /// Probes in execution order
    pub const ALL: [Probe; 4] = [
        Probe::ModelYearInteger,
        Probe::ElectricRangeIntegerOrNull,
        Probe::CafvEligibleBoolean,
        Probe::VinPresent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Probe::ModelYearInteger => "model_year_integer",
            Probe::ElectricRangeIntegerOrNull => "electric_range_integer_or_null",
            Probe::CafvEligibleBoolean => "cafv_eligible_boolean",
            Probe::VinPresent => "vin_present",
        }
    }

    /// What a violation of this probe means
    pub fn description(&self) -> &'static str {
        match self {
            Probe::ModelYearInteger => "model_year contains non-integer values",
            Probe::ElectricRangeIntegerOrNull => {
                "electric_range contains values that are neither integer nor null"
            }
            Probe::CafvEligibleBoolean => "cafv_eligible contains non-boolean values",
            Probe::VinPresent => "vin contains null or empty values",
        }
    }

    /// True when `document` breaks this probe's invariant
    pub fn violated_by(&self, document: &Value) -> bool {
        match self {
            Probe::ModelYearInteger => !is_integer(document.get(fields::MODEL_YEAR)),
            Probe::ElectricRangeIntegerOrNull => match document.get(fields::ELECTRIC_RANGE) {
                None | Some(Value::Null) => false,
                value => !is_integer(value),
            },
            Probe::CafvEligibleBoolean => !matches!(
                document.get(fields::CAFV_ELIGIBLE),
                Some(Value::Bool(_))
            ),
            Probe::VinPresent => match document.get(fields::VIN) {
                None | Some(Value::Null) => true,
                Some(Value::String(vin)) => vin.is_empty(),
                Some(_) => false,
            },
        }
    }
}

fn is_integer(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(n)) if n.is_i64() || n.is_u64())
}
