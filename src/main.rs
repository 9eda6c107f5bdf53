//! Command line entry point for the Offer Engine.
//!
//! `serve` starts the HTTP API; `compare` runs a single comparison read from
//! a YAML file and prints the result as JSON.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use offer_engine::api::{AppState, ComparisonRequest, create_router, perform_comparison};
use offer_engine::config::ConfigLoader;
use offer_engine::models::Comparison;

#[derive(Parser, Debug)]
#[command(
    name = "offer-engine",
    about = "Compare job offers by projected cumulative earnings, before or after tax"
)]
struct Cli {
    #[arg(long, global = true, help = "Log at debug level unless RUST_LOG says otherwise")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "./config/tax2016")]
        config: PathBuf,
    },
    /// Compare the offers in a YAML file and print the result as JSON.
    Compare {
        file: PathBuf,
        #[arg(long, default_value = "./config/tax2016")]
        config: PathBuf,
        #[arg(long, help = "Report gross figures, ignoring the file's taxes flag")]
        no_taxes: bool,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Serve { port, config } => serve(port, config).await,
        Command::Compare {
            file,
            config,
            no_taxes,
        } => compare(file, config, no_taxes),
    }
}

async fn serve(port: u16, config: PathBuf) -> anyhow::Result<()> {
    let loader = ConfigLoader::load(&config)
        .with_context(|| format!("loading tax schedule from {}", config.display()))?;
    let schedule = loader.into_schedule();
    info!(
        tax_year = schedule.tax_year(),
        jurisdictions = ?schedule.jurisdiction_codes(),
        "tax schedule loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "offer engine listening");

    axum::serve(listener, create_router(AppState::new(schedule)))
        .await
        .context("HTTP server failed")
}

fn compare(file: PathBuf, config: PathBuf, no_taxes: bool) -> anyhow::Result<()> {
    let content = fs::read_to_string(&file)
        .with_context(|| format!("reading comparison from {}", file.display()))?;
    let request: ComparisonRequest = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing comparison from {}", file.display()))?;

    let taxed = request.taxes && !no_taxes;
    let loader = ConfigLoader::load(&config)
        .with_context(|| format!("loading tax schedule from {}", config.display()))?;
    let comparison = Comparison::try_from(request)?;
    debug!(
        offers = comparison.offers.len(),
        start_date = %comparison.start_date,
        nr_years = comparison.nr_years,
        taxed,
        "comparison loaded"
    );

    let result = perform_comparison(&comparison, taxed, loader.schedule())?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
