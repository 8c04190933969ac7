use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Categories a coupon may be filed under.
pub const CATEGORIES: [&str; 6] = [
    "Consumerism",
    "Travel and Vacation",
    "Culture and Leisure",
    "Cars",
    "Insurance",
    "Finance and Banking",
];

/// Consumer-status classifications a coupon may target.
pub const CONSUMER_STATUSES: [&str; 10] = [
    "Young", "Senior", "Homeowner", "Traveler", "Tech", "Pets", "Fitness", "Student", "Remote",
    "Family",
];

/// Default terms text used when a provider supplies none.
pub const TERMS_SENTINEL: &str = "See provider website for details";

/// How the `price` field of a coupon is to be interpreted.
///
/// Serialized names match the stored document values exactly, including the
/// historical capitalization of `Cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    #[serde(rename = "fixed_amount")]
    FixedAmount,
    #[serde(rename = "percentage")]
    Percentage,
    #[serde(rename = "buy_one_get_one")]
    BuyOneGetOne,
    #[serde(rename = "Cost")]
    Cost,
}

impl DiscountType {
    /// Parses a stored document value into a variant.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fixed_amount" => Some(Self::FixedAmount),
            "percentage" => Some(Self::Percentage),
            "buy_one_get_one" => Some(Self::BuyOneGetOne),
            "Cost" => Some(Self::Cost),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedAmount => "fixed_amount",
            Self::Percentage => "percentage",
            Self::BuyOneGetOne => "buy_one_get_one",
            Self::Cost => "Cost",
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical coupon document, post-normalization.
///
/// `coupon_code` is the natural key used for upsert deduplication when
/// non-empty. `valid_until` is either `%Y-%m-%d` or `""` (no expiry), so
/// lexicographic comparison doubles as date comparison. Fields that were
/// present in the input but are not part of the canonical schema are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponRecord {
    pub discount_id: String,
    pub title: String,
    pub price: i64,
    /// Absent in documents imported before type inference existed.
    pub discount_type: Option<DiscountType>,
    pub description: String,
    pub image_link: String,
    pub discount_link: String,
    pub terms_and_conditions: String,
    pub club_name: Vec<String>,
    /// Entries drawn from [`CATEGORIES`].
    pub category: Vec<String>,
    pub valid_until: String,
    pub usage_limit: Option<i64>,
    pub coupon_code: String,
    pub provider_link: String,
    /// Entries drawn from [`CONSUMER_STATUSES`].
    pub consumer_statuses: Vec<String>,
    /// Unrecognized input fields, preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CouponRecord {
    /// Returns `true` when the record carries a natural key for dedup.
    #[must_use]
    pub fn has_natural_key(&self) -> bool {
        !self.coupon_code.is_empty()
    }

    /// Returns `true` when the coupon expired strictly before `today`
    /// (`%Y-%m-%d`). An empty `valid_until` means no expiry.
    #[must_use]
    pub fn is_expired(&self, today: &str) -> bool {
        !self.valid_until.is_empty() && self.valid_until.as_str() < today
    }

    /// Overlays this record's `extra` map onto `previous`'s: keys only the
    /// previous document had (accumulated counters and the like) are carried
    /// forward, while keys present in both keep this record's value.
    pub fn merge_extra_from(&mut self, previous: &CouponRecord) {
        for (key, value) in &previous.extra {
            if !self.extra.contains_key(key) {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }
}
