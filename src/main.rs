//! BC Ferries schedule API.
//!
//! Scrapes the public current-conditions pages on a fixed interval,
//! normalizes them into a terminal-keyed schedule, and serves the latest
//! snapshot over read-only HTTP endpoints.

mod cli;
mod config;
mod refresh;
mod routes;
mod scrape;
mod storage;
mod store;
mod terminals;
mod types;

use axum::{routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::routes::AppState;
use crate::scrape::HttpClient;
use crate::storage::SnapshotRepository;
use crate::store::SnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => run_server(host, port).await,
        Commands::Scrape { pretty } => cli::run_scrape(pretty).await,
    }
}

/// Run the API server and the background refresh loop.
async fn run_server(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry_schedule_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AppConfig::load()?;
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    tracing::info!("Configuration loaded");

    let repository = SnapshotRepository::new(Path::new(&config.storage.db_path))?;

    // Warm the store with the last persisted snapshot, so a restart serves
    // stale data instead of nothing while the first scrape runs.
    let store = Arc::new(SnapshotStore::new());
    match repository.latest()? {
        Some(snapshot) => {
            tracing::info!("Loaded snapshot from {} out of storage", snapshot.scraped_at);
            store.replace(snapshot);
        }
        None => tracing::info!("No stored snapshot, waiting for first scrape"),
    }
    let repository = Arc::new(Mutex::new(repository));

    let client = HttpClient::new(
        &config.scraper.user_agent,
        Duration::from_secs(config.scraper.request_timeout_secs),
    )?;
    tokio::spawn(refresh::run(
        config.scraper.clone(),
        client,
        store.clone(),
        repository,
    ));

    let state = Arc::new(AppState { store });

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/", get(routes::all_sailings))
        .route("/api/{departureTerminal}/", get(routes::by_departure))
        .route(
            "/api/{departureTerminal}/{destinationTerminal}/",
            get(routes::by_route),
        )
        .route(
            "/api/{departureTerminal}/{destinationTerminal}/{dataType}/",
            get(routes::by_data_type),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
