//! Defaulter: guarantees every canonical field is present after this stage.
//! `null` and the `"N/A"` placeholder count as absent; present values are
//! never overwritten.

use serde_json::{Map, Value};
use uuid::Uuid;

use offerbase_core::TERMS_SENTINEL;

const STRING_DEFAULTS: [&str; 7] = [
    "title",
    "description",
    "image_link",
    "discount_link",
    "provider_link",
    "coupon_code",
    "valid_until",
];

const ARRAY_DEFAULTS: [&str; 3] = ["club_name", "category", "consumer_statuses"];

/// Fields whose absence is represented as an explicit `null` so the typed
/// record deserializes them as `None`.
const NULL_DEFAULTS: [&str; 3] = ["price", "usage_limit", "discount_type"];

/// Fills schema-defined defaults for absent canonical fields in place.
pub fn apply_defaults(record: &mut Map<String, Value>) {
    if is_absent(record.get("discount_id")) {
        record.insert(
            "discount_id".to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
    }

    for field in STRING_DEFAULTS {
        if is_absent(record.get(field)) {
            record.insert(field.to_string(), Value::String(String::new()));
        }
    }

    for field in ARRAY_DEFAULTS {
        if is_absent(record.get(field)) {
            record.insert(field.to_string(), Value::Array(vec![]));
        }
    }

    for field in NULL_DEFAULTS {
        if is_absent(record.get(field)) {
            record.insert(field.to_string(), Value::Null);
        }
    }

    if is_absent(record.get("terms_and_conditions")) {
        record.insert(
            "terms_and_conditions".to_string(),
            Value::String(TERMS_SENTINEL.to_string()),
        );
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("n/a"),
        Some(_) => false,
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
    fn empty_record_gains_every_canonical_field() {
        let mut record = Map::new();
        apply_defaults(&mut record);

        for field in [
            "discount_id",
            "title",
            "price",
            "discount_type",
            "description",
            "image_link",
            "discount_link",
            "terms_and_conditions",
            "club_name",
            "category",
            "valid_until",
            "usage_limit",
            "coupon_code",
            "provider_link",
            "consumer_statuses",
        ] {
            assert!(record.contains_key(field), "missing default for {field}");
        }

        assert_eq!(record["title"], json!(""));
        assert_eq!(record["category"], json!([]));
        assert_eq!(record["price"], Value::Null);
        assert_eq!(record["terms_and_conditions"], json!(TERMS_SENTINEL));
    }

    #[test]
    fn generates_discount_id_when_absent() {
        let mut record = Map::new();
        apply_defaults(&mut record);
        let id = record["discount_id"].as_str().expect("id should be string");
        assert!(!id.is_empty());

        let mut other = Map::new();
        apply_defaults(&mut other);
        assert_ne!(record["discount_id"], other["discount_id"]);
    }

    #[test]
    fn present_values_are_not_overwritten() {
        let mut record = to_map(json!({
            "title": "Keep me",
            "terms_and_conditions": "Custom terms",
            "category": ["Cars"],
        }));
        apply_defaults(&mut record);

        assert_eq!(record["title"], json!("Keep me"));
        assert_eq!(record["terms_and_conditions"], json!("Custom terms"));
        assert_eq!(record["category"], json!(["Cars"]));
    }

    #[test]
    fn not_applicable_placeholder_counts_as_absent() {
        let mut record = to_map(json!({
            "title": "N/A",
            "terms_and_conditions": "n/a",
        }));
        apply_defaults(&mut record);

        assert_eq!(record["title"], json!(""));
        assert_eq!(record["terms_and_conditions"], json!(TERMS_SENTINEL));
    }

    #[test]
    fn empty_string_is_present_not_defaulted() {
        let mut record = to_map(json!({ "terms_and_conditions": "" }));
        apply_defaults(&mut record);
        assert_eq!(record["terms_and_conditions"], json!(""));
    }
}
