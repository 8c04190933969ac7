//! Sequential enrichment of discount batches with bounded retry and
//! rate-limit model rotation.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::client::EnrichClient;
use crate::error::EnrichError;
use crate::prompt::system_prompt;
use crate::rotation::ModelRotation;

/// Retry and pacing knobs. Defaults mirror the import-side configuration:
/// two retries with a 2 s linear backoff and a 1 s pause between records.
#[derive(Debug, Clone, Copy)]
pub struct EnrichSettings {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub pause_ms: u64,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay_ms: 2000,
            pause_ms: 1000,
        }
    }
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct EnrichReport {
    pub total: usize,
    /// Successfully re-classified records, in input order.
    pub enriched: Vec<Map<String, Value>>,
    /// `discount_id`s (or `"unknown"`) of records left out after exhausting
    /// retries and the model rotation.
    pub skipped_ids: Vec<String>,
}

/// Sends one record through the chat-completion endpoint.
///
/// Rate limits advance the rotation without consuming a retry, bounded to
/// one full cycle through the model list; other failures retry up to
/// `settings.max_retries` times with a linear backoff. Returns `None` once
/// both budgets are exhausted; the caller keeps the original record, and
/// the failure has already been logged.
pub async fn enrich_record(
    client: &EnrichClient,
    rotation: &mut ModelRotation,
    record: &Map<String, Value>,
    settings: EnrichSettings,
) -> Option<Map<String, Value>> {
    let record_id = record_id(record);
    let system_message = system_prompt();
    let user_message = format!(
        "Please enhance this discount object according to the instructions:\n{}",
        serde_json::to_string_pretty(&Value::Object(record.clone())).unwrap_or_default()
    );

    let mut retries = 0u32;
    let mut rate_limits = 0usize;

    loop {
        let model = rotation.current().to_string();
        match client
            .complete_json(&model, &system_message, &user_message)
            .await
        {
            Ok(enriched) => return Some(enriched),
            Err(EnrichError::RateLimited(message)) => {
                rate_limits += 1;
                if rate_limits >= rotation.len() {
                    tracing::warn!(
                        record_id,
                        "every model rate-limited; keeping original record"
                    );
                    return None;
                }
                let next = rotation.advance().to_string();
                tracing::info!(record_id, model, next, message, "rate limited; switching model");
                tokio::time::sleep(Duration::from_millis(settings.pause_ms)).await;
            }
            Err(error) => {
                if retries < settings.max_retries {
                    retries += 1;
                    tracing::info!(
                        record_id,
                        retries,
                        max_retries = settings.max_retries,
                        %error,
                        "enrichment failed; retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(settings.retry_delay_ms)).await;
                } else {
                    tracing::warn!(
                        record_id,
                        %error,
                        "max retries exceeded; keeping original record"
                    );
                    return None;
                }
            }
        }
    }
}

/// Enriches a batch sequentially, pausing between records to stay under
/// provider rate limits. Failed records are excluded from the output and
/// listed in `skipped_ids`.
pub async fn enrich_batch(
    client: &EnrichClient,
    rotation: &mut ModelRotation,
    records: Vec<Map<String, Value>>,
    settings: EnrichSettings,
) -> EnrichReport {
    let mut report = EnrichReport {
        total: records.len(),
        ..EnrichReport::default()
    };

    for (index, record) in records.into_iter().enumerate() {
        let record_id = record_id(&record);
        tracing::info!(
            record_id,
            position = index + 1,
            total = report.total,
            "processing discount"
        );

        match enrich_record(client, rotation, &record, settings).await {
            Some(enriched) => report.enriched.push(enriched),
            None => report.skipped_ids.push(record_id),
        }

        if index + 1 < report.total {
            tokio::time::sleep(Duration::from_millis(settings.pause_ms)).await;
        }
    }

    tracing::info!(
        total = report.total,
        enriched = report.enriched.len(),
        skipped = report.skipped_ids.len(),
        "enrichment batch complete"
    );

    report
}

fn record_id(record: &Map<String, Value>) -> String {
    match record.get("discount_id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "unknown".to_string(),
    }
}
