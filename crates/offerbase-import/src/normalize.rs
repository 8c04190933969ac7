//! Pipeline front half: mapping, coercion, defaulting, and the conversion
//! of a validated field map into a typed [`CouponRecord`].

use serde_json::{Map, Number, Value};

use offerbase_core::CouponRecord;

use crate::coerce::coerce_types;
use crate::defaults::apply_defaults;
use crate::mapper::map_fields;
use crate::validate::validate_record;
use crate::warnings::NormalizeWarning;

/// A record that has passed the mapper, coercer, and defaulter, together
/// with the non-fatal warnings those stages produced.
#[derive(Debug)]
pub struct NormalizedRecord {
    pub fields: Map<String, Value>,
    pub warnings: Vec<NormalizeWarning>,
}

/// Runs the mapping → coercion → defaulting stages over a raw record.
#[must_use]
pub fn normalize_record(mut raw: Map<String, Value>) -> NormalizedRecord {
    let mut warnings = map_fields(&mut raw);
    warnings.extend(coerce_types(&mut raw));
    apply_defaults(&mut raw);
    NormalizedRecord {
        fields: raw,
        warnings,
    }
}

/// Validates a normalized field map and converts it into the typed record.
///
/// Float prices survive coercion (decimal input); the canonical schema is
/// integer-valued, so fractional values are truncated here, after range
/// validation has seen the exact value.
///
/// # Errors
///
/// Returns the validator's message, or a description of a type mismatch the
/// validator does not cover (e.g. a numeric `description`).
pub fn finalize_record(fields: &Map<String, Value>) -> Result<CouponRecord, String> {
    validate_record(fields)?;

    let mut fields = fields.clone();
    truncate_to_integer(&mut fields, "price");
    truncate_to_integer(&mut fields, "usage_limit");

    serde_json::from_value(Value::Object(fields)).map_err(|e| format!("malformed record: {e}"))
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_to_integer(fields: &mut Map<String, Value>, field: &str) {
    let truncated = match fields.get(field) {
        Some(Value::Number(n)) if n.as_i64().is_none() => n.as_f64().map(|f| f.trunc() as i64),
        _ => return,
    };
    if let Some(value) = truncated {
        fields.insert(field.to_string(), Value::Number(Number::from(value)));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use offerbase_core::{DiscountType, TERMS_SENTINEL};

    use super::*;

    fn to_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn percent_price_roundtrip() {
        let raw = to_map(json!({
            "title": "T1",
            "price": "25%",
            "discount_link": "http://x",
        }));
        let normalized = normalize_record(raw);
        assert!(normalized.warnings.is_empty());

        let record = finalize_record(&normalized.fields).expect("record should be valid");
        assert_eq!(record.price, 25);
        assert_eq!(record.discount_type, Some(DiscountType::Percentage));
        assert!(record.category.is_empty());
        assert!(record.consumer_statuses.is_empty());
        assert_eq!(record.terms_and_conditions, TERMS_SENTINEL);
    }

    #[test]
    fn legacy_csv_row_normalizes_end_to_end() {
        let raw = to_map(json!({
            "code": "SAVE10",
            "amount": "10",
            "price_type": "percent",
            "title": "Ten percent off",
            "discount_link": "https://shop.example/deal",
            "date_expires": "16.04.25",
            "category": "Cars,Insurance",
            "free_shipping": "yes",
        }));
        let normalized = normalize_record(raw);
        let record = finalize_record(&normalized.fields).expect("record should be valid");

        assert_eq!(record.coupon_code, "SAVE10");
        assert_eq!(record.price, 10);
        assert_eq!(record.discount_type, Some(DiscountType::Percentage));
        assert_eq!(record.valid_until, "2025-04-16");
        assert_eq!(record.category, vec!["Cars", "Insurance"]);
        // Legacy flags are not canonical fields; they ride along in `extra`.
        assert_eq!(record.extra["free_shipping"], json!(true));
        assert!(!record.discount_id.is_empty());
    }

    #[test]
    fn fractional_price_truncates_after_validation() {
        let raw = to_map(json!({
            "title": "T",
            "price": "19.99",
            "discount_type": "fixed_amount",
            "discount_link": "http://x",
        }));
        let normalized = normalize_record(raw);
        let record = finalize_record(&normalized.fields).expect("record should be valid");
        assert_eq!(record.price, 19);
    }

    #[test]
    fn invalid_record_reports_validator_message() {
        let raw = to_map(json!({ "title": "No link", "price": "5" }));
        let normalized = normalize_record(raw);
        let err = finalize_record(&normalized.fields).unwrap_err();
        assert!(err.contains("discount_link"), "got: {err}");
    }

    #[test]
    fn type_mismatch_outside_validator_scope_is_reported() {
        let raw = to_map(json!({
            "title": "T",
            "price": 5,
            "discount_link": "http://x",
            "description": 12,
        }));
        let normalized = normalize_record(raw);
        let err = finalize_record(&normalized.fields).unwrap_err();
        assert!(err.contains("malformed record"), "got: {err}");
    }
}
