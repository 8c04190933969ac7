//! Enrichment command handler: drives discount files through the
//! chat-completion client and writes `enhanced_<name>.json` siblings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

use offerbase_core::AppConfig;
use offerbase_enrich::{enrich_batch, EnrichClient, EnrichSettings, ModelRotation};
use offerbase_import::{discover_data_files, read_json_file};

pub(crate) async fn run_enrich(
    config: &AppConfig,
    input: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let api_key = config
        .groq_api_key
        .as_deref()
        .context("GROQ_API_KEY is not set; cannot run enrichment")?;

    let client = EnrichClient::with_base_url(
        api_key,
        config.enrich_timeout_secs,
        &config.enrich_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build enrichment client: {e}"))?;

    let mut rotation = ModelRotation::new(&config.enrich_models);
    let settings = EnrichSettings {
        max_retries: config.enrich_max_retries,
        retry_delay_ms: config.enrich_retry_delay_ms,
        pause_ms: config.enrich_pause_ms,
    };

    if input.is_dir() {
        anyhow::ensure!(
            output.is_none(),
            "--output only applies to single-file input"
        );
        let files: Vec<PathBuf> = discover_data_files(input)
            .with_context(|| format!("failed to scan {}", input.display()))?
            .into_iter()
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            // Don't feed previous runs' outputs back in.
            .filter(|path| !file_name_starts_with(path, "enhanced_"))
            .collect();

        if files.is_empty() {
            println!("No JSON files found under {}", input.display());
            return Ok(());
        }

        for file in files {
            enrich_file(&client, &mut rotation, settings, &file, None).await?;
        }
        return Ok(());
    }

    enrich_file(&client, &mut rotation, settings, input, output).await
}

async fn enrich_file(
    client: &EnrichClient,
    rotation: &mut ModelRotation,
    settings: EnrichSettings,
    input: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let records = read_json_file(input)
        .with_context(|| format!("failed to read discounts from {}", input.display()))?;

    println!(
        "Processing {} discounts from {}...",
        records.len(),
        input.display()
    );

    let report = enrich_batch(client, rotation, records, settings).await;
    let enriched_count = report.enriched.len();
    let skipped_count = report.skipped_ids.len();

    let output_path = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    let array = Value::Array(report.enriched.into_iter().map(Value::Object).collect());
    let rendered = serde_json::to_string_pretty(&array)?;
    std::fs::write(&output_path, rendered)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!("Total discounts parsed: {}", report.total);
    println!("Total discounts deprecated: {skipped_count}");
    if !report.skipped_ids.is_empty() {
        println!("Deprecated discount IDs: {}", report.skipped_ids.join(", "));
    }
    println!(
        "Processing complete: {enriched_count} discounts saved to {}",
        output_path.display()
    );
    Ok(())
}

/// `dir/file.json` → `dir/enhanced_file.json`.
fn default_output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("discounts.json");
    input.with_file_name(format!("enhanced_{file_name}"))
}

fn file_name_starts_with(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_prefixes_file_name() {
        let path = default_output_path(Path::new("data/coupons/hot_discounts.json"));
        assert_eq!(
            path,
            Path::new("data/coupons/enhanced_hot_discounts.json")
        );
    }

    #[test]
    fn enhanced_outputs_are_recognized() {
        assert!(file_name_starts_with(
            Path::new("data/enhanced_hot.json"),
            "enhanced_"
        ));
        assert!(!file_name_starts_with(Path::new("data/hot.json"), "enhanced_"));
    }
}
