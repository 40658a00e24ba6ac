//! Row normalization and the admission gate

use crate::vehicle::{Vehicle, ELIGIBLE_SENTINEL};

use super::rejection::Rejection;
use super::row::{columns, RawRow};

/// Trims and upper-cases a text value.
///
/// Absent, empty and all-whitespace values yield `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

/// Parses an integer, yielding `None` on absence or failure.
///
/// Surrounding whitespace and a leading sign are accepted. Decimal
/// notation ("42.0") is not an integer.
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    value?.trim().parse::<i64>().ok()
}

/// Normalizes one raw row into a canonical vehicle record.
///
/// # Errors
///
/// Returns the first admission failure in gate order: `vin`, `make`,
/// `model`, `model_year`. A model year of zero is treated as missing.
pub fn normalize(row: &RawRow) -> Result<Vehicle, Rejection> {
    let vin = normalize_text(row.get(columns::VIN)).ok_or(Rejection::MissingVin)?;
    let make = normalize_text(row.get(columns::MAKE)).ok_or(Rejection::MissingMake)?;
    let model = normalize_text(row.get(columns::MODEL)).ok_or(Rejection::MissingModel)?;
    let model_year = parse_int(row.get(columns::MODEL_YEAR))
        .filter(|year| *year != 0)
        .ok_or(Rejection::MissingModelYear)?;

    // Negative ranges are not ranges
    let electric_range = parse_int(row.get(columns::ELECTRIC_RANGE)).filter(|r| *r >= 0);

    let cafv_eligible = normalize_text(row.get(columns::CAFV_ELIGIBILITY)).as_deref()
        == Some(ELIGIBLE_SENTINEL);

    Ok(Vehicle {
        vin,
        county: normalize_text(row.get(columns::COUNTY)),
        state: normalize_text(row.get(columns::STATE)),
        make,
        model,
        model_year,
        vehicle_type: normalize_text(row.get(columns::VEHICLE_TYPE)),
        electric_range,
        cafv_eligible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::BEV_TYPE;

    fn full_row() -> RawRow {
        RawRow::from_pairs([
            (columns::VIN, " 5yj3e1ea0k "),
            (columns::COUNTY, "King"),
            (columns::STATE, "wa"),
            (columns::MAKE, "Tesla"),
            (columns::MODEL, "Model 3"),
            (columns::MODEL_YEAR, "2019"),
            (columns::VEHICLE_TYPE, "Battery Electric Vehicle (BEV)"),
            (columns::ELECTRIC_RANGE, "220"),
            (
                columns::CAFV_ELIGIBILITY,
                "Clean Alternative Fuel Vehicle Eligible",
            ),
        ])
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text(Some("  king ")), Some("KING".to_string()));
        assert_eq!(normalize_text(Some("   ")), None);
        assert_eq!(normalize_text(Some("")), None);
        assert_eq!(normalize_text(None), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(Some(" 42 ")), Some(42));
        assert_eq!(parse_int(Some("-3")), Some(-3));
        assert_eq!(parse_int(Some("42.0")), None);
        assert_eq!(parse_int(Some("abc")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn test_full_row_is_normalized() {
        let vehicle = normalize(&full_row()).unwrap();
        assert_eq!(vehicle.vin, "5YJ3E1EA0K");
        assert_eq!(vehicle.county.as_deref(), Some("KING"));
        assert_eq!(vehicle.state.as_deref(), Some("WA"));
        assert_eq!(vehicle.make, "TESLA");
        assert_eq!(vehicle.model, "MODEL 3");
        assert_eq!(vehicle.model_year, 2019);
        assert_eq!(vehicle.vehicle_type.as_deref(), Some(BEV_TYPE));
        assert_eq!(vehicle.electric_range, Some(220));
        assert!(vehicle.cafv_eligible);
    }

    #[test]
    fn test_gate_order() {
        let row = RawRow::new();
        assert_eq!(normalize(&row), Err(Rejection::MissingVin));

        let row = full_row().with(columns::MAKE, Some("  "));
        assert_eq!(normalize(&row), Err(Rejection::MissingMake));

        let row = full_row().with(columns::MODEL, None);
        assert_eq!(normalize(&row), Err(Rejection::MissingModel));

        let row = full_row().with(columns::MODEL_YEAR, Some("twenty"));
        assert_eq!(normalize(&row), Err(Rejection::MissingModelYear));
    }

    #[test]
    fn test_zero_model_year_rejected() {
        let row = full_row().with(columns::MODEL_YEAR, Some("0"));
        assert_eq!(normalize(&row), Err(Rejection::MissingModelYear));
    }

    #[test]
    fn test_bad_range_is_null_not_rejection() {
        let row = full_row().with(columns::ELECTRIC_RANGE, Some("n/a"));
        assert_eq!(normalize(&row).unwrap().electric_range, None);

        let row = full_row().with(columns::ELECTRIC_RANGE, Some("-5"));
        assert_eq!(normalize(&row).unwrap().electric_range, None);

        let row = full_row().with(columns::ELECTRIC_RANGE, Some("0"));
        assert_eq!(normalize(&row).unwrap().electric_range, Some(0));
    }

    #[test]
    fn test_eligibility_is_exact_match() {
        let cases = [
            (Some("clean alternative fuel vehicle eligible  "), true),
            (Some("Not eligible due to low battery range"), false),
            (
                Some("Eligibility unknown as battery range has not been researched"),
                false,
            ),
            (Some("Clean Alternative Fuel Vehicle Eligible!"), false),
            (Some(""), false),
            (None, false),
        ];

        for (text, expected) in cases {
            let row = full_row().with(columns::CAFV_ELIGIBILITY, text);
            assert_eq!(normalize(&row).unwrap().cafv_eligible, expected, "{:?}", text);
        }
    }

    #[test]
    fn test_unknown_vehicle_type_passes_through() {
        let row = full_row().with(columns::VEHICLE_TYPE, Some("fuel cell"));
        assert_eq!(
            normalize(&row).unwrap().vehicle_type.as_deref(),
            Some("FUEL CELL")
        );
    }

    #[test]
    fn test_deterministic() {
        let row = full_row();
        assert_eq!(normalize(&row), normalize(&row));
    }
}
