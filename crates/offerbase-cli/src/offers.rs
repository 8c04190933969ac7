//! Import, management, verification, and migration command handlers.
//!
//! These are called from `main` after configuration is loaded. Database
//! commands connect their own pool; `import --dry-run` runs the full
//! pipeline against an in-memory store instead.

use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use serde_json::{Map, Value};

use offerbase_core::AppConfig;
use offerbase_db::{CouponFilter, CouponRow, PgCouponStore, PoolConfig};
use offerbase_import::{
    discover_data_files, import_records, read_csv_file, read_json_file, ImportOptions,
    ImportReport, MemoryStore,
};

/// Cap on error lines printed per report; the rest collapse into a suffix.
const MAX_REPORT_ERRORS: usize = 10;

/// Sub-commands available under `offers`.
#[derive(Debug, Subcommand)]
pub enum OffersCommands {
    /// Remove offers
    Remove {
        /// Remove the offer with this exact code
        #[arg(long)]
        code: Option<String>,
        /// Remove all expired offers
        #[arg(long)]
        expired: bool,
        /// Remove all offers
        #[arg(long)]
        all: bool,
    },
    /// List offers
    List {
        /// Show only active (non-expired) offers
        #[arg(long)]
        active: bool,
        /// Show only expired offers
        #[arg(long)]
        expired: bool,
        /// Filter offers by code (substring match)
        #[arg(long)]
        code: Option<String>,
        /// Filter offers by minimum price
        #[arg(long)]
        min_price: Option<i64>,
        /// Filter offers by maximum price
        #[arg(long)]
        max_price: Option<i64>,
        /// Filter offers by discount type
        #[arg(long)]
        discount_type: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub(crate) async fn run_import(
    config: &AppConfig,
    file: &Path,
    update: bool,
    clear: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let records = read_records(file)?;
    let options = ImportOptions {
        update_existing: update,
        ..ImportOptions::default()
    };

    if dry_run {
        let store = MemoryStore::new();
        let report = import_records(&store, records, options).await;
        println!("dry-run: no documents were written");
        println!("{}", report.render(MAX_REPORT_ERRORS));
        return Ok(());
    }

    let pool = connect(config).await?;
    if clear {
        let deleted = offerbase_db::delete_all(&pool).await?;
        println!("Deleted {deleted} existing coupons");
    }

    let store = PgCouponStore::new(pool);
    let report = import_records(&store, records, options).await;
    println!("{}", report.render(MAX_REPORT_ERRORS));
    Ok(())
}

pub(crate) async fn run_import_dir(
    config: &AppConfig,
    dir: Option<&Path>,
    update: bool,
) -> anyhow::Result<()> {
    let dir = dir.unwrap_or(&config.data_dir);
    let files = discover_data_files(dir)
        .with_context(|| format!("failed to scan data directory {}", dir.display()))?;

    if files.is_empty() {
        println!("No data files found under {}", dir.display());
        return Ok(());
    }

    let pool = connect(config).await?;
    let store = PgCouponStore::new(pool);
    let options = ImportOptions {
        update_existing: update,
        ..ImportOptions::default()
    };

    let mut combined = ImportReport::default();
    for file in &files {
        let records = match read_records(file) {
            Ok(records) => records,
            Err(error) => {
                // A malformed file should not stop the remaining files.
                tracing::error!(file = %file.display(), %error, "skipping unreadable data file");
                continue;
            }
        };
        let report = import_records(&store, records, options).await;
        println!(
            "{}: {} total, {} valid, {} invalid",
            file.display(),
            report.total,
            report.valid,
            report.invalid
        );
        combined.absorb(report);
    }

    println!("\nCombined across {} files:", files.len());
    println!("{}", combined.render(MAX_REPORT_ERRORS));
    Ok(())
}

pub(crate) async fn run_offers(config: &AppConfig, command: OffersCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;

    match command {
        OffersCommands::Remove { code, expired, all } => {
            if let Some(code) = code {
                let removed = offerbase_db::delete_by_code(&pool, &code).await?;
                if removed > 0 {
                    println!("Removed offer with code: {code}");
                } else {
                    println!("No offer found with code: {code}");
                }
            } else if expired {
                let removed = offerbase_db::delete_expired(&pool, &today()).await?;
                println!("Removed {removed} expired offers");
            } else if all {
                let removed = offerbase_db::delete_all(&pool).await?;
                println!("Removed all offers ({removed} total)");
            } else {
                println!("No removal criteria specified. Use --code, --expired, or --all");
            }
        }
        OffersCommands::List {
            active,
            expired,
            code,
            min_price,
            max_price,
            discount_type,
            format,
        } => {
            let filter = CouponFilter {
                active_as_of: active.then(today),
                expired_as_of: expired.then(today),
                code_substring: code,
                min_price,
                max_price,
                discount_type,
            };
            let rows = offerbase_db::list_coupons(&pool, &filter).await?;

            if rows.is_empty() {
                println!("No offers found matching the criteria");
                return Ok(());
            }

            match format {
                OutputFormat::Json => print_offers_json(rows)?,
                OutputFormat::Table => print_offers_table(&rows),
            }
        }
    }

    Ok(())
}

pub(crate) async fn run_verify(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let today = today();
    let active = offerbase_db::count_active(&pool, &today).await?;
    let expired = offerbase_db::count_expired(&pool, &today).await?;
    println!("Coupon stats: {active} active, {expired} expired");
    Ok(())
}

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let applied = offerbase_db::run_migrations(&pool)
        .await
        .context("migration run failed")?;
    println!("Applied {applied} migrations");
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not set; required for this command")?;
    offerbase_db::connect_pool(database_url, PoolConfig::from_app_config(config))
        .await
        .context("failed to connect to the database")
}

/// Reads raw records from a file, dispatching on its extension. The content
/// kind is fixed to coupons by the import options; no sniffing happens here.
fn read_records(file: &Path) -> anyhow::Result<Vec<Map<String, Value>>> {
    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => read_json_file(file)
            .with_context(|| format!("error importing coupons from {}", file.display())),
        "csv" => read_csv_file(file)
            .with_context(|| format!("error importing coupons from {}", file.display())),
        other => anyhow::bail!("unsupported file type '{other}': use JSON or CSV files"),
    }
}

fn print_offers_json(rows: Vec<CouponRow>) -> anyhow::Result<()> {
    let records: Vec<_> = rows.into_iter().map(CouponRow::into_record).collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn print_offers_table(rows: &[CouponRow]) {
    println!("Found {} offers:", rows.len());
    println!("{}", "-".repeat(100));
    println!(
        "{:<15} | {:<8} | {:<15} | {:<12} | {:<30}",
        "CODE", "PRICE", "TYPE", "EXPIRES", "TITLE"
    );
    println!("{}", "-".repeat(100));

    for row in rows {
        let code = if row.coupon_code.is_empty() {
            "-"
        } else {
            &row.coupon_code
        };
        let expires = if row.valid_until.is_empty() {
            "Never"
        } else {
            &row.valid_until
        };
        let discount_type = row.discount_type.as_deref().unwrap_or("-");
        println!(
            "{:<15} | {:<8} | {:<15} | {:<12} | {:<30}",
            truncated(code, 15),
            row.price,
            truncated(discount_type, 15),
            expires,
            truncated(&row.title, 30)
        );
    }
}

fn truncated(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
