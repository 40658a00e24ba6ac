//! Document predicates
//!
//! Predicates are conjunctive. No type coercion: a string never equals a
//! number. A missing or null field never matches.

use serde_json::Value;

/// Filter operation for a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Exact equality
    Eq(Value),
    /// Set membership (exact equality against any listed value)
    In(Vec<Value>),
    /// Inclusive lower bound
    Gte(Value),
    /// Inclusive upper bound
    Lte(Value),
}

impl FilterOp {
    /// Equality-style operations are answerable from an index
    pub fn is_equality(&self) -> bool {
        matches!(self, FilterOp::Eq(_) | FilterOp::In(_))
    }
}

/// A predicate on one document field
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field name
    pub field: String,
    /// Filter operation
    pub op: FilterOp,
}

impl Predicate {
    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value),
        }
    }

    /// Create a set-membership predicate
    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::In(values),
        }
    }

    /// Create an inclusive lower-bound predicate
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value),
        }
    }

    /// Create an inclusive upper-bound predicate
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value),
        }
    }
}

/// Evaluates predicates against documents
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a document matches all predicates (AND semantics)
    pub fn matches(document: &Value, predicates: &[Predicate]) -> bool {
        predicates
            .iter()
            .all(|pred| Self::matches_predicate(document, pred))
    }

    fn matches_predicate(document: &Value, predicate: &Predicate) -> bool {
        let field_value = match document.get(&predicate.field) {
            Some(v) if !v.is_null() => v,
            _ => return false,
        };

        match &predicate.op {
            FilterOp::Eq(expected) => field_value == expected,
            FilterOp::In(values) => values.iter().any(|v| v == field_value),
            FilterOp::Gte(bound) => Self::compare(field_value, bound)
                .map(|o| o.is_ge())
                .unwrap_or(false),
            FilterOp::Lte(bound) => Self::compare(field_value, bound)
                .map(|o| o.is_le())
                .unwrap_or(false),
        }
    }

    /// Orders two values of the same kind; mixed kinds are incomparable
    fn compare(actual: &Value, bound: &Value) -> Option<std::cmp::Ordering> {
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                    return Some(ai.cmp(&bi));
                }
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_match() {
        let doc = json!({"county": "KING", "model_year": 2020});

        assert!(PredicateFilter::matches(&doc, &[Predicate::eq("county", json!("KING"))]));
        assert!(!PredicateFilter::matches(&doc, &[Predicate::eq("county", json!("PIERCE"))]));
    }

    #[test]
    fn test_no_type_coercion() {
        let doc = json!({"model_year": 2020});
        assert!(!PredicateFilter::matches(&doc, &[Predicate::eq("model_year", json!("2020"))]));
        assert!(PredicateFilter::matches(&doc, &[Predicate::eq("model_year", json!(2020))]));
    }

    #[test]
    fn test_set_membership() {
        let doc = json!({"make": "TESLA"});
        let pred = Predicate::is_in("make", vec![json!("NISSAN"), json!("TESLA")]);
        assert!(PredicateFilter::matches(&doc, &[pred]));

        let pred = Predicate::is_in("make", vec![]);
        assert!(!PredicateFilter::matches(&doc, &[pred]));
    }

    #[test]
    fn test_inclusive_range() {
        let doc = json!({"model_year": 2020});
        let preds = vec![
            Predicate::gte("model_year", json!(2020)),
            Predicate::lte("model_year", json!(2020)),
        ];
        assert!(PredicateFilter::matches(&doc, &preds));

        let preds = vec![Predicate::gte("model_year", json!(2021))];
        assert!(!PredicateFilter::matches(&doc, &preds));
    }

    #[test]
    fn test_null_and_missing_never_match() {
        let doc = json!({"electric_range": null});
        assert!(!PredicateFilter::matches(&doc, &[Predicate::gte("electric_range", json!(0))]));
        assert!(!PredicateFilter::matches(&doc, &[Predicate::eq("county", json!("KING"))]));
    }

    #[test]
    fn test_range_on_mixed_kinds_fails() {
        let doc = json!({"electric_range": "200"});
        assert!(!PredicateFilter::matches(&doc, &[Predicate::gte("electric_range", json!(100))]));
    }

    #[test]
    fn test_empty_predicates_match_everything() {
        assert!(PredicateFilter::matches(&json!({}), &[]));
    }
}
