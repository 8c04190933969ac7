use clap::Parser;

use super::*;
use crate::offers::{OffersCommands, OutputFormat};

#[test]
fn parses_import_with_flags() {
    let cli = Cli::try_parse_from([
        "offerbase",
        "import",
        "coupons.json",
        "--update",
        "--clear",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Import {
            ref file,
            update: true,
            clear: true,
            dry_run: false,
        } if file == std::path::Path::new("coupons.json")
    ));
}

#[test]
fn parses_import_dry_run() {
    let cli = Cli::try_parse_from(["offerbase", "import", "coupons.csv", "--dry-run"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Import { dry_run: true, .. }
    ));
}

#[test]
fn parses_import_dir_with_default_dir() {
    let cli = Cli::try_parse_from(["offerbase", "import-dir"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::ImportDir {
            dir: None,
            update: false
        }
    ));
}

#[test]
fn parses_offers_remove_by_code() {
    let cli = Cli::try_parse_from(["offerbase", "offers", "remove", "--code", "SAVE10"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Offers {
            command: OffersCommands::Remove {
                code: Some(ref c),
                expired: false,
                all: false,
            }
        } if c == "SAVE10"
    ));
}

#[test]
fn parses_offers_list_filters() {
    let cli = Cli::try_parse_from([
        "offerbase",
        "offers",
        "list",
        "--active",
        "--min-price",
        "5",
        "--discount-type",
        "percentage",
        "--format",
        "json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Offers {
            command: OffersCommands::List {
                active: true,
                expired: false,
                min_price: Some(5),
                discount_type: Some(ref t),
                format: OutputFormat::Json,
                ..
            }
        } if t == "percentage"
    ));
}

#[test]
fn parses_verify_and_migrate() {
    let cli = Cli::try_parse_from(["offerbase", "verify"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Verify));

    let cli = Cli::try_parse_from(["offerbase", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Migrate));
}

#[test]
fn parses_enrich_with_output() {
    let cli = Cli::try_parse_from([
        "offerbase",
        "enrich",
        "data/hot_discounts.json",
        "--output",
        "out.json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Enrich {
            ref input,
            output: Some(ref output),
        } if input == std::path::Path::new("data/hot_discounts.json")
            && output == std::path::Path::new("out.json")
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["offerbase"]).is_err());
}
