//! HTTP API for the map front end.
//!
//! Lists categories and region presets, and runs a spot search for a drawn region.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tabimap::{Config, OverpassClient};

mod handlers;
use handlers::{router, AppState};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Tourist spot search server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overpass endpoint, overrides the config file
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.overpass.endpoint = endpoint;
    }

    info!("Tabimap Server");
    info!("Using Overpass endpoint {}", config.overpass.endpoint);

    let client = OverpassClient::new(&config.overpass)?;
    let catalog = config.catalog();
    info!("Loaded {} categories", catalog.len());

    let state = Arc::new(AppState {
        catalog,
        client,
        config,
    });

    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
