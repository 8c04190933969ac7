//! Upsert coordinator: drives each raw record through normalization and
//! validation, then persists it by natural key. Records are processed
//! strictly in sequence; a failure affects only its own record.

use serde_json::{Map, Value};

use offerbase_core::{CouponRecord, CouponStore, StoreError};

use crate::normalize::{finalize_record, normalize_record};
use crate::report::ImportReport;

/// What a batch of raw records contains. The kind is an explicit caller
/// decision; the importer never sniffs file contents to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Coupon,
}

#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    pub kind: ContentKind,
    /// When `true`, records whose `coupon_code` already exists are merged
    /// and replaced; when `false` they are skipped.
    pub update_existing: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            kind: ContentKind::Coupon,
            update_existing: false,
        }
    }
}

enum Persisted {
    New,
    Updated,
    Skipped,
}

/// Imports a batch of raw records through the full pipeline.
///
/// Returns the aggregate report; record-level validation and persistence
/// failures are captured in it rather than propagated.
pub async fn import_records<S: CouponStore>(
    store: &S,
    raw_records: Vec<Map<String, Value>>,
    options: ImportOptions,
) -> ImportReport {
    match options.kind {
        ContentKind::Coupon => {}
    }

    let mut report = ImportReport {
        total: raw_records.len(),
        ..ImportReport::default()
    };

    for raw in raw_records {
        let normalized = normalize_record(raw);
        for warning in &normalized.warnings {
            tracing::warn!(%warning, "normalization warning");
        }

        match finalize_record(&normalized.fields) {
            Ok(record) => persist_record(store, record, options.update_existing, &mut report).await,
            Err(error) => {
                report.invalid += 1;
                report.errors.push(format!(
                    "invalid record '{}': {error}",
                    record_label(&normalized.fields)
                ));
            }
        }
    }

    report
}

async fn persist_record<S: CouponStore>(
    store: &S,
    mut record: CouponRecord,
    update_existing: bool,
    report: &mut ImportReport,
) {
    let label = if record.has_natural_key() {
        record.coupon_code.clone()
    } else {
        record.title.clone()
    };

    match upsert(store, &mut record, update_existing).await {
        Ok(Persisted::New) => {
            report.new += 1;
            report.valid += 1;
        }
        Ok(Persisted::Updated) => {
            report.updated += 1;
            report.valid += 1;
        }
        Ok(Persisted::Skipped) => report.skipped += 1,
        Err(error) => {
            report.invalid += 1;
            report
                .errors
                .push(format!("failed to persist '{label}': {error}"));
        }
    }
}

async fn upsert<S: CouponStore>(
    store: &S,
    record: &mut CouponRecord,
    update_existing: bool,
) -> Result<Persisted, StoreError> {
    // No natural key: nothing to deduplicate on, always a fresh insert.
    if !record.has_natural_key() {
        store.insert(record).await?;
        return Ok(Persisted::New);
    }

    match store.find_by_code(&record.coupon_code).await? {
        Some(existing) => {
            if update_existing {
                record.merge_extra_from(&existing);
                store.replace(&record.coupon_code, record).await?;
                Ok(Persisted::Updated)
            } else {
                Ok(Persisted::Skipped)
            }
        }
        None => {
            store.insert(record).await?;
            Ok(Persisted::New)
        }
    }
}

/// Imports a parsed JSON document (single object or array of objects).
///
/// # Errors
///
/// Returns [`crate::ImportError::UnsupportedShape`] for scalar documents;
/// record-level failures land in the report instead.
pub async fn import_from_json<S: CouponStore>(
    store: &S,
    data: Value,
    options: ImportOptions,
) -> Result<ImportReport, crate::ImportError> {
    let records = crate::reader::read_json_records(data)?;
    Ok(import_records(store, records, options).await)
}

/// Imports CSV content with a header row.
///
/// # Errors
///
/// Returns [`crate::ImportError::Csv`] if the input is not parseable as
/// CSV; record-level failures land in the report instead.
pub async fn import_from_csv<S: CouponStore, R: std::io::Read>(
    store: &S,
    input: R,
    options: ImportOptions,
) -> Result<ImportReport, crate::ImportError> {
    let records = crate::reader::read_csv_records(input)?;
    Ok(import_records(store, records, options).await)
}

/// Best identifier available for an error message: the coupon code, falling
/// back to the title, falling back to `"unknown"`.
fn record_label(fields: &Map<String, Value>) -> String {
    for field in ["coupon_code", "title"] {
        if let Some(Value::String(s)) = fields.get(field) {
            if !s.is_empty() {
                return s.clone();
            }
        }
    }
    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn record_label_prefers_code_over_title() {
        let fields = match json!({ "coupon_code": "SAVE", "title": "T" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(record_label(&fields), "SAVE");
    }

    #[test]
    fn record_label_falls_back_to_title_then_unknown() {
        let fields = match json!({ "coupon_code": "", "title": "T" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(record_label(&fields), "T");
        assert_eq!(record_label(&Map::new()), "unknown");
    }
}
