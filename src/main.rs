use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use connectos_feed::api;
use connectos_feed::config::Config;
use connectos_feed::db::init_database;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,connectos_feed=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    Config::init()?;
    info!("Initialized configuration");

    // Initialize database
    let db = Arc::new(init_database().await?);
    info!("Connected to database");

    // Start API server
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_api_server(db).await {
            error!("API server error: {}", e);
        }
    });

    // Run until the server stops or a shutdown signal arrives
    tokio::select! {
        _ = api_handle => {},
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Shutdown signal received, initiating graceful shutdown"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        },
    }

    info!("ConnectOS feed service shutdown complete");
    Ok(())
}
