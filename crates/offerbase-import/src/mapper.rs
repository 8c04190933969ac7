//! Field mapper: translates legacy/alternate key names and discount-type
//! spellings into the canonical schema. Pure transform; unknown keys are
//! passed through unchanged so additive schema fields survive a round trip.

use serde_json::{Map, Value};

use crate::warnings::NormalizeWarning;

/// Legacy key → canonical key. A rename only happens when the canonical key
/// is absent; otherwise the legacy key is left in place as a passthrough
/// field rather than clobbering the canonical value.
const KEY_RENAMES: [(&str, &str); 5] = [
    ("code", "coupon_code"),
    ("id", "discount_id"),
    ("amount", "price"),
    ("date_expires", "valid_until"),
    ("price_type", "discount_type"),
];

/// Rewrites legacy key names and discount-type values in place.
///
/// Returns mapping warnings for unrecognized `discount_type` values, which
/// are passed through unchanged for the validator to judge.
pub fn map_fields(record: &mut Map<String, Value>) -> Vec<NormalizeWarning> {
    let mut warnings = Vec::new();

    for (legacy, canonical) in KEY_RENAMES {
        if record.contains_key(legacy) && !record.contains_key(canonical) {
            if let Some(value) = record.remove(legacy) {
                record.insert(canonical.to_string(), value);
            }
        }
    }

    let raw = match record.get("discount_type") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return warnings,
    };

    match canonical_discount_type(&raw) {
        Some(canonical) => {
            if canonical != raw {
                record.insert(
                    "discount_type".to_string(),
                    Value::String(canonical.to_string()),
                );
            }
        }
        None => warnings.push(NormalizeWarning::mapping(
            "discount_type",
            format!("unrecognized value '{raw}' passed through"),
        )),
    }

    warnings
}

/// Maps legacy discount-type spellings onto the canonical enum values.
fn canonical_discount_type(raw: &str) -> Option<&'static str> {
    match raw {
        "percent" | "percentage" => Some("percentage"),
        "fixed_cart" | "fixed_product" | "fixed_amount" => Some("fixed_amount"),
        "buy_one_get_one" => Some("buy_one_get_one"),
        "Cost" => Some("Cost"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn to_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn renames_legacy_keys() {
        let mut record = to_map(json!({
            "code": "SAVE10",
            "id": "42",
            "amount": "10",
            "date_expires": "2025-06-01",
        }));
        let warnings = map_fields(&mut record);

        assert!(warnings.is_empty());
        assert_eq!(record["coupon_code"], json!("SAVE10"));
        assert_eq!(record["discount_id"], json!("42"));
        assert_eq!(record["price"], json!("10"));
        assert_eq!(record["valid_until"], json!("2025-06-01"));
        assert!(!record.contains_key("code"));
        assert!(!record.contains_key("amount"));
    }

    #[test]
    fn canonical_key_wins_over_legacy() {
        let mut record = to_map(json!({
            "coupon_code": "CANONICAL",
            "code": "LEGACY",
        }));
        map_fields(&mut record);

        assert_eq!(record["coupon_code"], json!("CANONICAL"));
        // The legacy key survives as a passthrough field.
        assert_eq!(record["code"], json!("LEGACY"));
    }

    #[test]
    fn rewrites_legacy_discount_type_values() {
        for (legacy, canonical) in [
            ("percent", "percentage"),
            ("fixed_cart", "fixed_amount"),
            ("fixed_product", "fixed_amount"),
        ] {
            let mut record = to_map(json!({ "discount_type": legacy }));
            let warnings = map_fields(&mut record);
            assert!(warnings.is_empty(), "no warning expected for {legacy}");
            assert_eq!(record["discount_type"], json!(canonical));
        }
    }

    #[test]
    fn canonical_discount_type_values_untouched() {
        for value in ["percentage", "fixed_amount", "buy_one_get_one", "Cost"] {
            let mut record = to_map(json!({ "discount_type": value }));
            let warnings = map_fields(&mut record);
            assert!(warnings.is_empty());
            assert_eq!(record["discount_type"], json!(value));
        }
    }

    #[test]
    fn unrecognized_discount_type_warns_and_passes_through() {
        let mut record = to_map(json!({ "discount_type": "mystery" }));
        let warnings = map_fields(&mut record);

        assert_eq!(record["discount_type"], json!("mystery"));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            NormalizeWarning::Mapping { field, .. } if field == "discount_type"
        ));
    }

    #[test]
    fn maps_price_type_to_discount_type() {
        let mut record = to_map(json!({ "price_type": "percent" }));
        let warnings = map_fields(&mut record);
        assert!(warnings.is_empty());
        assert_eq!(record["discount_type"], json!("percentage"));
        assert!(!record.contains_key("price_type"));
    }

    #[test]
    fn unknown_keys_pass_through() {
        let mut record = to_map(json!({ "minimum_amount": "5", "free_shipping": "yes" }));
        map_fields(&mut record);
        assert_eq!(record["minimum_amount"], json!("5"));
        assert_eq!(record["free_shipping"], json!("yes"));
    }
}
