//! Normalizer Property Tests
//!
//! Properties:
//! - Admitted rows carry upper-cased required fields and an integer year
//! - A row missing any required field is rejected, never partially stored
//! - Eligibility is true iff the trimmed, upper-cased text equals the sentinel

use evstats::normalizer::{columns, normalize, RawRow, Rejection};
use evstats::vehicle::ELIGIBLE_SENTINEL;

// =============================================================================
// Test Utilities
// =============================================================================

fn row(vin: Option<&str>, make: Option<&str>, model: Option<&str>, year: Option<&str>) -> RawRow {
    RawRow::new()
        .with(columns::VIN, vin)
        .with(columns::MAKE, make)
        .with(columns::MODEL, model)
        .with(columns::MODEL_YEAR, year)
}

// =============================================================================
// ADMISSION GATE
// =============================================================================

#[test]
fn test_valid_rows_are_upper_cased() {
    let cases = [
        ("abc123", "tesla", "model s", "2014"),
        ("  1n4az0cp5d ", "Nissan", "Leaf", " 2013 "),
        ("WBY8P6C5XK", "BMW", "i3", "+2019"),
    ];

    for (vin, make, model, year) in cases {
        let vehicle = normalize(&row(Some(vin), Some(make), Some(model), Some(year))).unwrap();
        assert_eq!(vehicle.vin, vin.trim().to_uppercase());
        assert_eq!(vehicle.make, make.trim().to_uppercase());
        assert_eq!(vehicle.model, model.trim().to_uppercase());
        assert_eq!(vehicle.model_year, year.trim().parse::<i64>().unwrap());
    }
}

#[test]
fn test_any_missing_required_field_rejects() {
    let present = [Some("VIN"), Some("MAKE"), Some("MODEL"), Some("2020")];
    let blanks = [None, Some(""), Some("   ")];

    for slot in 0..4 {
        for blank in blanks {
            let mut fields = present;
            fields[slot] = blank;
            let result = normalize(&row(fields[0], fields[1], fields[2], fields[3]));
            assert!(result.is_err(), "slot {} blank {:?} was admitted", slot, blank);
        }
    }
}

#[test]
fn test_unparsable_year_rejects() {
    for year in ["20x0", "2020.0", "", "0"] {
        assert_eq!(
            normalize(&row(Some("V"), Some("M"), Some("X"), Some(year))),
            Err(Rejection::MissingModelYear),
            "{:?}",
            year
        );
    }
}

// =============================================================================
// ELIGIBILITY
// =============================================================================

#[test]
fn test_eligibility_iff_sentinel() {
    let texts = [
        ELIGIBLE_SENTINEL.to_string(),
        ELIGIBLE_SENTINEL.to_lowercase(),
        format!("  {}  ", ELIGIBLE_SENTINEL),
        "Not eligible due to low battery range".to_string(),
        format!("{} (pending)", ELIGIBLE_SENTINEL),
        String::new(),
    ];

    for text in &texts {
        let raw = row(Some("V"), Some("M"), Some("X"), Some("2020"))
            .with(columns::CAFV_ELIGIBILITY, Some(text.as_str()));
        let expected = text.trim().to_uppercase() == ELIGIBLE_SENTINEL;
        assert_eq!(normalize(&raw).unwrap().cafv_eligible, expected, "{:?}", text);
    }

    let absent = row(Some("V"), Some("M"), Some("X"), Some("2020"));
    assert!(!normalize(&absent).unwrap().cafv_eligible);
}
