//! Database operations for the `coupons` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use offerbase_core::{CouponRecord, CouponStore, DiscountType, StoreError};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, discount_id, title, price, discount_type, description, image_link, \
                       discount_link, terms_and_conditions, club_name, category, valid_until, \
                       usage_limit, coupon_code, provider_link, consumer_statuses, extra, \
                       created_at, updated_at";

/// A row from the `coupons` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CouponRow {
    pub id: i64,
    pub discount_id: String,
    pub title: String,
    pub price: i64,
    /// `NULL` for documents imported before type inference existed.
    pub discount_type: Option<String>,
    pub description: String,
    pub image_link: String,
    pub discount_link: String,
    pub terms_and_conditions: String,
    pub club_name: Vec<String>,
    pub category: Vec<String>,
    /// `%Y-%m-%d` or `''` (no expiry); lexicographic compare is date compare.
    pub valid_until: String,
    pub usage_limit: Option<i64>,
    pub coupon_code: String,
    pub provider_link: String,
    pub consumer_statuses: Vec<String>,
    /// Passthrough fields preserved from the source document.
    pub extra: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CouponRow {
    /// Converts the stored row back into the canonical document shape.
    #[must_use]
    pub fn into_record(self) -> CouponRecord {
        let discount_type = self.discount_type.as_deref().and_then(|raw| {
            let parsed = DiscountType::parse(raw);
            if parsed.is_none() {
                tracing::warn!(raw, coupon_code = %self.coupon_code, "stored discount_type is not canonical");
            }
            parsed
        });

        let extra = match self.extra {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        CouponRecord {
            discount_id: self.discount_id,
            title: self.title,
            price: self.price,
            discount_type,
            description: self.description,
            image_link: self.image_link,
            discount_link: self.discount_link,
            terms_and_conditions: self.terms_and_conditions,
            club_name: self.club_name,
            category: self.category,
            valid_until: self.valid_until,
            usage_limit: self.usage_limit,
            coupon_code: self.coupon_code,
            provider_link: self.provider_link,
            consumer_statuses: self.consumer_statuses,
            extra,
        }
    }
}

// ---------------------------------------------------------------------------
// CouponStore implementation
// ---------------------------------------------------------------------------

/// Postgres-backed [`CouponStore`] used by the upsert coordinator.
#[derive(Debug, Clone)]
pub struct PgCouponStore {
    pool: PgPool,
}

impl PgCouponStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CouponStore for PgCouponStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<CouponRecord>, StoreError> {
        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "SELECT {COLUMNS} FROM coupons WHERE coupon_code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::new(e.to_string()))?;

        Ok(row.map(CouponRow::into_record))
    }

    async fn insert(&self, record: &CouponRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO coupons \
                 (discount_id, title, price, discount_type, description, image_link, \
                  discount_link, terms_and_conditions, club_name, category, valid_until, \
                  usage_limit, coupon_code, provider_link, consumer_statuses, extra) \
             VALUES ($1, $2, $3, $4, $5, $6, \
                     $7, $8, $9, $10, $11, \
                     $12, $13, $14, $15, $16::jsonb)",
        )
        .bind(&record.discount_id)
        .bind(&record.title)
        .bind(record.price)
        .bind(record.discount_type.map(DiscountType::as_str))
        .bind(&record.description)
        .bind(&record.image_link)
        .bind(&record.discount_link)
        .bind(&record.terms_and_conditions)
        .bind(&record.club_name)
        .bind(&record.category)
        .bind(&record.valid_until)
        .bind(record.usage_limit)
        .bind(&record.coupon_code)
        .bind(&record.provider_link)
        .bind(&record.consumer_statuses)
        .bind(Value::Object(record.extra.clone()))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::new(e.to_string()))?;

        Ok(())
    }

    async fn replace(&self, code: &str, record: &CouponRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE coupons SET \
                 discount_id          = $2, \
                 title                = $3, \
                 price                = $4, \
                 discount_type        = $5, \
                 description          = $6, \
                 image_link           = $7, \
                 discount_link        = $8, \
                 terms_and_conditions = $9, \
                 club_name            = $10, \
                 category             = $11, \
                 valid_until          = $12, \
                 usage_limit          = $13, \
                 provider_link        = $14, \
                 consumer_statuses    = $15, \
                 extra                = $16::jsonb, \
                 updated_at           = NOW() \
             WHERE coupon_code = $1",
        )
        .bind(code)
        .bind(&record.discount_id)
        .bind(&record.title)
        .bind(record.price)
        .bind(record.discount_type.map(DiscountType::as_str))
        .bind(&record.description)
        .bind(&record.image_link)
        .bind(&record.discount_link)
        .bind(&record.terms_and_conditions)
        .bind(&record.club_name)
        .bind(&record.category)
        .bind(&record.valid_until)
        .bind(record.usage_limit)
        .bind(&record.provider_link)
        .bind(&record.consumer_statuses)
        .bind(Value::Object(record.extra.clone()))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::new(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::new(format!(
                "no document with coupon_code '{code}'"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Administrative operations
// ---------------------------------------------------------------------------

/// Filters for [`list_coupons`]. All fields are optional and combine with AND.
#[derive(Debug, Default, Clone)]
pub struct CouponFilter {
    /// Keep only coupons still valid on this `%Y-%m-%d` date.
    pub active_as_of: Option<String>,
    /// Keep only coupons expired strictly before this `%Y-%m-%d` date.
    pub expired_as_of: Option<String>,
    /// Case-insensitive substring match on `coupon_code`.
    pub code_substring: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub discount_type: Option<String>,
}

/// Lists coupons matching the filter, ordered by code then id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_coupons(pool: &PgPool, filter: &CouponFilter) -> Result<Vec<CouponRow>, DbError> {
    let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
        "SELECT {COLUMNS} FROM coupons WHERE TRUE"
    ));

    if let Some(today) = &filter.active_as_of {
        builder.push(" AND (valid_until = '' OR valid_until >= ");
        builder.push_bind(today);
        builder.push(")");
    }
    if let Some(today) = &filter.expired_as_of {
        builder.push(" AND valid_until <> '' AND valid_until < ");
        builder.push_bind(today);
    }
    if let Some(code) = &filter.code_substring {
        builder.push(" AND coupon_code ILIKE ");
        builder.push_bind(format!("%{code}%"));
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND price >= ");
        builder.push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND price <= ");
        builder.push_bind(max_price);
    }
    if let Some(discount_type) = &filter.discount_type {
        builder.push(" AND discount_type = ");
        builder.push_bind(discount_type);
    }

    builder.push(" ORDER BY coupon_code, id");

    let rows = builder
        .build_query_as::<CouponRow>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Deletes the coupon stored under `code`. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_by_code(pool: &PgPool, code: &str) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM coupons WHERE coupon_code = $1")
        .bind(code)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes every coupon expired strictly before `today` (`%Y-%m-%d`).
/// Coupons without an expiry are never removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_expired(pool: &PgPool, today: &str) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM coupons WHERE valid_until <> '' AND valid_until < $1")
        .bind(today)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes every coupon. Used by `--clear` before a fresh import.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_all(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM coupons").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Counts coupons still valid on `today` (no expiry counts as active).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_active(pool: &PgPool, today: &str) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM coupons WHERE valid_until = '' OR valid_until >= $1",
    )
    .bind(today)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Counts coupons expired strictly before `today`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_expired(pool: &PgPool, today: &str) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM coupons WHERE valid_until <> '' AND valid_until < $1",
    )
    .bind(today)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
