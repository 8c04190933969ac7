mod enrich;
mod offers;
#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "offerbase")]
#[command(about = "Coupon aggregation and enrichment toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import coupons from a JSON or CSV file
    Import {
        /// Path to the JSON or CSV file containing coupon data
        file: PathBuf,
        /// Update existing coupons instead of skipping them
        #[arg(long)]
        update: bool,
        /// Clear existing coupons before importing
        #[arg(long)]
        clear: bool,
        /// Run the pipeline against an in-memory store, writing nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Import every JSON/CSV file found under a directory
    ImportDir {
        /// Directory to walk (defaults to the configured data dir)
        dir: Option<PathBuf>,
        /// Update existing coupons instead of skipping them
        #[arg(long)]
        update: bool,
    },
    /// Manage stored offers
    Offers {
        #[command(subcommand)]
        command: offers::OffersCommands,
    },
    /// Report active/expired coupon counts
    Verify,
    /// Re-classify discount files via the chat-completion API
    Enrich {
        /// JSON file, or directory of JSON files, to enrich
        input: PathBuf,
        /// Output path (single-file input only; defaults to enhanced_<name>)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = offerbase_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import {
            file,
            update,
            clear,
            dry_run,
        } => offers::run_import(&config, &file, update, clear, dry_run).await,
        Commands::ImportDir { dir, update } => {
            offers::run_import_dir(&config, dir.as_deref(), update).await
        }
        Commands::Offers { command } => offers::run_offers(&config, command).await,
        Commands::Verify => offers::run_verify(&config).await,
        Commands::Enrich { input, output } => {
            enrich::run_enrich(&config, &input, output.as_deref()).await
        }
        Commands::Migrate => offers::run_migrate(&config).await,
    }
}
