//! Type coercer: converts string-typed cells into numbers, arrays, and
//! booleans, and normalizes date strings into ISO form. Conversions that
//! fail keep the original value and emit a [`NormalizeWarning`] instead of
//! raising; the validator decides later whether the record survives.

use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

use crate::warnings::NormalizeWarning;

const ARRAY_FIELDS: [&str; 3] = ["category", "club_name", "consumer_statuses"];
const BOOL_FIELDS: [&str; 3] = ["individual_use", "free_shipping", "exclude_sale_items"];

/// Accepted input date formats, tried in order; first match wins.
const DATE_FORMATS: [&str; 4] = ["%d.%m.%y", "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Coerces values in place toward the canonical types.
pub fn coerce_types(record: &mut Map<String, Value>) -> Vec<NormalizeWarning> {
    let mut warnings = Vec::new();

    coerce_price(record, &mut warnings);
    coerce_integer_field(record, "usage_limit", &mut warnings);
    for field in ARRAY_FIELDS {
        coerce_array(record, field);
    }
    for field in BOOL_FIELDS {
        coerce_bool(record, field);
    }
    coerce_valid_until(record, &mut warnings);

    warnings
}

/// Parses `price`, handling the trailing-`%` form. A percent suffix also
/// infers `discount_type = percentage` when no type is set yet.
fn coerce_price(record: &mut Map<String, Value>, warnings: &mut Vec<NormalizeWarning>) {
    // Legacy exports wrap the amount in an object: {"amount": 25, ...}.
    let legacy_amount = match record.get("price") {
        Some(Value::Object(obj)) => obj.get("amount").cloned(),
        _ => None,
    };
    if let Some(amount) = legacy_amount {
        record.insert("price".to_string(), amount);
    }

    let raw = match record.get("price") {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return,
    };

    if raw.is_empty() {
        // Leave absence detection to the defaulter/validator.
        record.insert("price".to_string(), Value::Null);
        return;
    }

    let (numeric_part, had_percent) = match raw.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (raw.as_str(), false),
    };

    match parse_number(numeric_part) {
        Some(number) => {
            record.insert("price".to_string(), Value::Number(number));
            if had_percent && !has_discount_type(record) {
                record.insert(
                    "discount_type".to_string(),
                    Value::String("percentage".to_string()),
                );
            }
        }
        None => warnings.push(NormalizeWarning::coercion(
            "price",
            format!("could not parse '{raw}' as a number"),
        )),
    }
}

/// Integer-then-float parse for a string-typed numeric field.
fn coerce_integer_field(
    record: &mut Map<String, Value>,
    field: &str,
    warnings: &mut Vec<NormalizeWarning>,
) {
    let raw = match record.get(field) {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return,
    };

    if raw.is_empty() {
        record.insert(field.to_string(), Value::Null);
        return;
    }

    match parse_number(&raw) {
        Some(number) => {
            record.insert(field.to_string(), Value::Number(number));
        }
        None => warnings.push(NormalizeWarning::coercion(
            field,
            format!("could not parse '{raw}' as a number"),
        )),
    }
}

/// Integer parse, falling back to float only when a decimal point is present.
fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Number::from(n));
    }
    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            return Number::from_f64(f);
        }
    }
    None
}

fn has_discount_type(record: &Map<String, Value>) -> bool {
    matches!(record.get("discount_type"), Some(Value::String(s)) if !s.is_empty())
}

/// Ensures an array-typed field is always an array: comma-containing strings
/// are split and trimmed, bare scalars are wrapped, empty values become `[]`.
fn coerce_array(record: &mut Map<String, Value>, field: &str) {
    let replacement = match record.get(field) {
        None | Some(Value::Array(_)) => return,
        Some(Value::Null) => Value::Array(vec![]),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
                Value::Array(vec![])
            } else if trimmed.contains(',') {
                Value::Array(
                    trimmed
                        .split(',')
                        .map(str::trim)
                        .filter(|part| !part.is_empty())
                        .map(|part| Value::String(part.to_string()))
                        .collect(),
                )
            } else {
                Value::Array(vec![Value::String(trimmed.to_string())])
            }
        }
        Some(Value::Number(n)) => Value::Array(vec![Value::String(n.to_string())]),
        Some(Value::Bool(b)) => Value::Array(vec![Value::String(b.to_string())]),
        Some(Value::Object(_)) => return,
    };
    record.insert(field.to_string(), replacement);
}

/// Boolean coercion for legacy flag fields: `"true"`/`"yes"`/`"1"`
/// (case-insensitive) become `true`, any other string becomes `false`.
fn coerce_bool(record: &mut Map<String, Value>, field: &str) {
    let raw = match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        _ => return,
    };
    let truthy = matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    );
    record.insert(field.to_string(), Value::Bool(truthy));
}

/// Normalizes `valid_until` to `%Y-%m-%d`, trying each accepted format in
/// order. Unparseable strings pass through unchanged with a warning;
/// ambiguous day/month inputs are resolved by format order, not rejected.
fn coerce_valid_until(record: &mut Map<String, Value>, warnings: &mut Vec<NormalizeWarning>) {
    let raw = match record.get("valid_until") {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return,
    };

    if raw.is_empty() || raw.eq_ignore_ascii_case("n/a") {
        return;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&raw, format) {
            record.insert(
                "valid_until".to_string(),
                Value::String(date.format("%Y-%m-%d").to_string()),
            );
            return;
        }
    }

    warnings.push(NormalizeWarning::coercion(
        "valid_until",
        format!("unrecognized date format '{raw}'"),
    ));
}
