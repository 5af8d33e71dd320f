//! # pricing-cli
//!
//! Command-line front end for `pricing-core`.
//!
//! Commands:
//! - `pricing-cli quote <REQUEST.json>` - price a quote request, print the breakdown
//! - `pricing-cli config` - print the effective configuration
//!
//! Logs go to stderr (`RUST_LOG` controls the filter); stdout carries only
//! the command output.

mod error;
mod request;
mod settings;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::request::QuoteRequest;

/// Price shopping carts from the command line
#[derive(Parser)]
#[command(name = "pricing-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file path (defaults to ./pricing.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a JSON quote request
    Quote(QuoteArgs),

    /// Print the effective pricing configuration as TOML
    Config,
}

#[derive(Args)]
struct QuoteArgs {
    /// Request file, or `-` for stdin
    request: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = settings::load(cli.config.as_deref()).context("Failed to load pricing config")?;
    info!(
        global_discount = %config.global_discount,
        global_tax_rate = %config.global_tax_rate,
        tax_base = %config.tax_base,
        fire_events = config.fire_events,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Quote(args) => {
            let json = read_request(&args.request)?;
            let request = QuoteRequest::from_json(&json)
                .with_context(|| format!("Failed to parse {}", args.request.display()))?;
            let totals = request::run_quote(config, request)?;

            let output = if args.pretty {
                serde_json::to_string_pretty(&totals)?
            } else {
                serde_json::to_string(&totals)?
            };
            println!("{output}");
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `warn` for dependencies, `info` for the pricing crates
/// - Override with the `RUST_LOG` environment variable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,pricing_core=info,pricing_cli=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_request(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("Failed to read request from stdin")?;
        return Ok(json);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
