use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use house_finder::config::StoreBackend;
use house_finder::{
    CheaperNearbyService, HouseFinderConfig, ListingStore, MemoryListingStore,
    SqliteListingStore, telemetry, web,
};

/// Find listings priced below the median of a chosen map area
#[derive(Debug, Parser)]
#[command(name = "house-finder", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,
}

fn open_store(config: &HouseFinderConfig) -> Result<Arc<dyn ListingStore>> {
    let path = &config.store.path;
    let store: Arc<dyn ListingStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(
            MemoryListingStore::from_json_file(path)
                .with_context(|| format!("Failed to load listings from {path}"))?,
        ),
        StoreBackend::Sqlite => Arc::new(
            SqliteListingStore::open(path)
                .with_context(|| format!("Failed to open SQLite store at {path}"))?,
        ),
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = HouseFinderConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    telemetry::init(&config.logging)?;
    info!(
        "house-finder {} starting with {:?} store at {}",
        house_finder::VERSION,
        config.store.backend,
        config.store.path
    );

    let store = open_store(&config)?;
    let service = CheaperNearbyService::new(store);

    web::run(&config.server, service).await
}
