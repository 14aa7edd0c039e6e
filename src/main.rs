//! House Finder API — Binary Entrypoint
//! Loads configuration and the listing dataset, then serves the Axum router.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use house_finder_api::ServiceConfig;

/// Install the tracing subscriber.
///   - filter from RUST_LOG, default `house_finder_api=info,warn`
///   - LOG_FORMAT=json switches to JSON lines
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("house_finder_api=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = ServiceConfig::from_env()?;
    let router = house_finder_api::app(&config)?;

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "The backend is running");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
