use thiserror::Error;

use crate::coupon::CouponRecord;

/// A failure in the persistence layer while handling a single record.
///
/// The import pipeline only ever stringifies these into its aggregate error
/// list, so the error carries a pre-rendered message rather than the
/// backend's native error type.
#[derive(Debug, Error)]
#[error("storage error: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Storage seam used by the upsert coordinator.
///
/// Implemented by the Postgres-backed store and by the in-memory store used
/// in tests and dry runs. Lookups are by exact `coupon_code`; records with
/// an empty code have no natural key and are never looked up or replaced.
pub trait CouponStore {
    /// Finds a stored document by its non-empty natural key.
    async fn find_by_code(&self, code: &str) -> Result<Option<CouponRecord>, StoreError>;

    /// Inserts a new document.
    async fn insert(&self, record: &CouponRecord) -> Result<(), StoreError>;

    /// Replaces the document whose `coupon_code` equals `code`.
    async fn replace(&self, code: &str, record: &CouponRecord) -> Result<(), StoreError>;
}
