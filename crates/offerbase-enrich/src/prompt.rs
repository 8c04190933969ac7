//! System prompt for the fixed-schema re-classification request.

use offerbase_core::{CATEGORIES, CONSUMER_STATUSES, TERMS_SENTINEL};

/// Discount types offered to the model, in schema order.
const DISCOUNT_TYPES: [&str; 4] = ["fixed_amount", "percentage", "buy_one_get_one", "Cost"];

/// Builds the system message instructing the model to re-classify a discount
/// object into the canonical schema, embedding the fixed catalogs.
#[must_use]
pub fn system_prompt() -> String {
    let categories = braced(&CATEGORIES);
    let consumer_statuses = braced(&CONSUMER_STATUSES);
    let discount_types = braced(&DISCOUNT_TYPES);

    format!(
        r#"You are a data processing API that enhances discount objects.
You must return a valid JSON object that follows this schema:
{{
  "discount_id": "string",
  "title": "string",
  "price": "integer",
  "discount_type": "enum",
  "description": "string",
  "image_link": "string",
  "discount_link": "string",
  "terms_and_conditions": "string",
  "club_name": ["string"],
  "category": ["string"],
  "valid_until": "string",
  "usage_limit": "integer",
  "coupon_code": "string",
  "provider_link": "string",
  "consumer_statuses": ["string"]
}}

The input data may contain Hebrew text. This is valuable information; focus only on extracting the required information.

Instructions for processing fields:
- discount_id: No change required. If "N/A", set to empty string.
- title: No change required. If "N/A", set to empty string.
- price: Extract the discount amount from the description field as an integer value.
  - fixed_amount: Must be > 0
  - percentage: Must be 1-100
  - buy_one_get_one: Must be 1
  - Cost: Must be > 0
- discount_type: Extract from the description field. Assign one value only from: {discount_types}
- description: No change required. If "N/A", set to empty string.
- image_link: No change required. If "N/A", set to empty string.
- discount_link: No change required. If "N/A", set to empty string.
- terms_and_conditions: No change required. If "N/A", set to "{TERMS_SENTINEL}".
- club_name: No change required. If "N/A", set to an empty array.
- category: Analyze the title and description and select relevant categories from: {categories}
- consumer_statuses: Analyze the title and description and select relevant statuses from: {consumer_statuses}
- valid_until: No change required. If "N/A", set to empty string.
- usage_limit: No change required. If "N/A", set to null.
- coupon_code: No change required. If "N/A", set to empty string.
- provider_link: No change required. If "N/A", set to empty string.

**IMPORTANT:**
- Return ONLY a valid JSON object, with NO extra text, code fences, or comments.
- Every key and string value must be enclosed in double quotes (").
- All arrays and objects must have correct JSON syntax.
- Do not include trailing commas.
- If a field is missing or not applicable, use the default value as specified in the schema.
- Do not invent or guess field names. Only use those in the schema.
- Before returning, validate your output to ensure it is valid JSON and matches the schema exactly.
- Return ONLY a valid JSON object with all fields from the schema and NOTHING ELSE."#
    )
}

fn braced(values: &[&str]) -> String {
    format!("{{{}}}", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_every_catalog() {
        let prompt = system_prompt();
        for category in CATEGORIES {
            assert!(prompt.contains(category), "missing category {category}");
        }
        for status in CONSUMER_STATUSES {
            assert!(prompt.contains(status), "missing status {status}");
        }
        for discount_type in DISCOUNT_TYPES {
            assert!(prompt.contains(discount_type), "missing type {discount_type}");
        }
    }

    #[test]
    fn prompt_embeds_terms_sentinel_and_schema_keys() {
        let prompt = system_prompt();
        assert!(prompt.contains(TERMS_SENTINEL));
        assert!(prompt.contains("\"consumer_statuses\""));
        assert!(prompt.contains("\"discount_id\""));
    }

    #[test]
    fn braced_joins_with_commas() {
        assert_eq!(braced(&["a", "b"]), "{a, b}");
    }
}
