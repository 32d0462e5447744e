//! CLI commands for the ferry schedule API.
//!
//! Supports the API server mode and a one-shot scrape for debugging the
//! parse pipeline against the live pages.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::config::AppConfig;
use crate::scrape::{self, HttpClient};

#[derive(Parser)]
#[command(name = "ferry-schedule-api")]
#[command(version, about = "BC Ferries schedule scraper and API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server and the scheduled scraper
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one scrape pass and print the snapshot as JSON
    Scrape {
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

/// Run a single scrape pass and print the result to stdout.
pub async fn run_scrape(pretty: bool) -> Result<()> {
    let config = AppConfig::load()?;
    let client = HttpClient::new(
        &config.scraper.user_agent,
        Duration::from_secs(config.scraper.request_timeout_secs),
    )?;

    let outcome = scrape::scrape_all(&client, &config.scraper).await?;

    for skipped in outcome.diagnostics.unexpected() {
        eprintln!("skipped row {}: {}", skipped.row, skipped.reason);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&outcome.snapshot)?
    } else {
        serde_json::to_string(&outcome.snapshot)?
    };
    println!("{}", json);

    Ok(())
}
