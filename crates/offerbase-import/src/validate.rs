//! Schema validator: the reject point of the pipeline. Returns a single
//! descriptive message per failing record; never panics.

use serde_json::{Map, Value};

use offerbase_core::{DiscountType, CATEGORIES, CONSUMER_STATUSES};

/// Validates a defaulted record against the canonical schema.
///
/// Checks required fields (`title`, `price`, `discount_link`), enum
/// membership for `discount_type` (empty/null counts as absent), numeric
/// ranges per type, and catalog membership for `category` and
/// `consumer_statuses` entries.
///
/// # Errors
///
/// Returns the first violation as a human-readable message naming the
/// offending field.
pub fn validate_record(record: &Map<String, Value>) -> Result<(), String> {
    for field in ["title", "discount_link"] {
        match record.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            None | Some(Value::String(_) | Value::Null) => {
                return Err(format!("missing required field: {field}"));
            }
            Some(_) => return Err(format!("{field} must be a string")),
        }
    }

    let price = match record.get("price") {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => f,
            None => return Err("price must be numeric".to_string()),
        },
        None | Some(Value::Null) => return Err("missing required field: price".to_string()),
        Some(other) => return Err(format!("price must be numeric, got '{other}'")),
    };
    if price < 0.0 {
        return Err(format!("price must be non-negative, got {price}"));
    }

    if let Some(discount_type) = parse_discount_type(record)? {
        validate_price_range(discount_type, price)?;
    }

    validate_catalog_entries(record, "category", &CATEGORIES)?;
    validate_catalog_entries(record, "consumer_statuses", &CONSUMER_STATUSES)?;

    Ok(())
}

fn parse_discount_type(record: &Map<String, Value>) -> Result<Option<DiscountType>, String> {
    match record.get("discount_type") {
        Some(Value::String(s)) if !s.is_empty() => DiscountType::parse(s)
            .map(Some)
            .ok_or_else(|| format!("invalid discount_type '{s}'")),
        None | Some(Value::String(_) | Value::Null) => Ok(None),
        Some(_) => Err("discount_type must be a string".to_string()),
    }
}

/// Price semantics depend on the discount type: percentages live in 1..=100,
/// fixed amounts and costs must be positive, and buy-one-get-one is exactly 1.
fn validate_price_range(discount_type: DiscountType, price: f64) -> Result<(), String> {
    match discount_type {
        DiscountType::Percentage => {
            if !(1.0..=100.0).contains(&price) {
                return Err(format!(
                    "percentage price must be between 1 and 100, got {price}"
                ));
            }
            if price > 50.0 {
                tracing::warn!(price, "high discount percentage");
            }
        }
        DiscountType::FixedAmount | DiscountType::Cost => {
            if price <= 0.0 {
                return Err(format!(
                    "{discount_type} price must be positive, got {price}"
                ));
            }
        }
        DiscountType::BuyOneGetOne => {
            if (price - 1.0).abs() > f64::EPSILON {
                return Err(format!("buy_one_get_one price must be 1, got {price}"));
            }
        }
    }
    Ok(())
}

fn validate_catalog_entries(
    record: &Map<String, Value>,
    field: &str,
    allowed: &[&str],
) -> Result<(), String> {
    let Some(Value::Array(entries)) = record.get(field) else {
        return Ok(());
    };
    for entry in entries {
        match entry {
            Value::String(s) if allowed.contains(&s.as_str()) => {}
            Value::String(s) => return Err(format!("unknown {field} entry '{s}'")),
            _ => return Err(format!("{field} entries must be strings")),
        }
    }
    Ok(())
}
