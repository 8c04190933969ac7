//! In-memory [`CouponStore`] used by tests and `--dry-run` imports.

use std::collections::HashMap;
use std::sync::Mutex;

use offerbase_core::{CouponRecord, CouponStore, StoreError};

/// HashMap-backed store mirroring the collection's keying rules: documents
/// with a natural key live under their `coupon_code` (unique), codeless
/// documents pile up in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    by_code: HashMap<String, CouponRecord>,
    codeless: Vec<CouponRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored documents.
    ///
    /// # Panics
    ///
    /// Panics if the store lock was poisoned by a panicking test thread.
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        inner.by_code.len() + inner.codeless.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the document stored under `code`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the store lock was poisoned by a panicking test thread.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<CouponRecord> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        inner.by_code.get(code).cloned()
    }

    /// Returns copies of the documents stored without a natural key, in
    /// insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the store lock was poisoned by a panicking test thread.
    #[must_use]
    pub fn codeless_records(&self) -> Vec<CouponRecord> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        inner.codeless.clone()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::new("memory store lock poisoned"))
    }
}

impl CouponStore for MemoryStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<CouponRecord>, StoreError> {
        Ok(self.lock()?.by_code.get(code).cloned())
    }

    async fn insert(&self, record: &CouponRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if record.coupon_code.is_empty() {
            inner.codeless.push(record.clone());
        } else {
            // Mirror the collection's unique-index guarantee.
            if inner.by_code.contains_key(&record.coupon_code) {
                return Err(StoreError::new(format!(
                    "duplicate coupon_code '{}'",
                    record.coupon_code
                )));
            }
            inner
                .by_code
                .insert(record.coupon_code.clone(), record.clone());
        }
        Ok(())
    }

    async fn replace(&self, code: &str, record: &CouponRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if !inner.by_code.contains_key(code) {
            return Err(StoreError::new(format!(
                "no document with coupon_code '{code}'"
            )));
        }
        inner.by_code.insert(code.to_string(), record.clone());
        Ok(())
    }
}
