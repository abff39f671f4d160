pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use karat_core::config::{AppConfig, LoadOptions, LogFormat};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "karat",
    about = "Karat storefront pricing CLI",
    long_about = "Reprice gold items from the commodity price and quote flat-interest installment plans.",
    after_help = "Examples:\n  karat reprice --product ring.json --commodity gold.json\n  karat quote --principal 1000 --settings credit.json\n  karat config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute the display price of a single product")]
    Reprice {
        #[arg(long, help = "Product pricing input as JSON")]
        product: PathBuf,
        #[arg(long, help = "Commodity price record as JSON")]
        commodity: PathBuf,
        #[arg(long, help = "Override the configured markup factor")]
        markup: Option<Decimal>,
    },
    #[command(about = "Quote installment plans for a principal")]
    Quote {
        #[arg(long, help = "Amount to finance")]
        principal: Decimal,
        #[arg(long, help = "Credit settings as JSON rows or named options")]
        settings: Option<PathBuf>,
        #[arg(long = "term", help = "Quote a single term in months instead of the full menu")]
        term_months: Option<u32>,
    },
    #[command(about = "Price a product and quote its installment plans")]
    Offer {
        #[arg(long)]
        product: PathBuf,
        #[arg(long)]
        commodity: PathBuf,
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    #[command(about = "Reprice a product list against one commodity price")]
    Catalog {
        #[arg(long, help = "Product records as a JSON array")]
        products: PathBuf,
        #[arg(long)]
        commodity: PathBuf,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

/// `RUST_LOG` wins over `logging.level` for ad hoc debugging.
fn log_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(log_filter(rust_log.as_deref(), &config.logging.level))
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!(error))
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Config errors are reported by the command itself.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("logging disabled: {error}");
        }
    }

    let result = match cli.command {
        Command::Reprice { product, commodity, markup } => {
            commands::reprice::run(&product, &commodity, markup)
        }
        Command::Quote { principal, settings, term_months } => {
            commands::quote::run(principal, settings.as_deref(), term_months)
        }
        Command::Offer { product, commodity, settings } => {
            commands::offer::run(&product, &commodity, settings.as_deref())
        }
        Command::Catalog { products, commodity } => commands::catalog::run(&products, &commodity),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
