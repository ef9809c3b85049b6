//! `netblockerd`: the firewall policy dashboard server.
//!
//! Usage:
//!   netblockerd [-c <config.toml>] [--listen <addr>]
//!
//! Without a config file the defaults apply. `PUBLIC_BACKEND_URL`
//! always overrides the backend URL.

mod routes;
mod session;

use std::path::PathBuf;

use clap::Parser;
use netblocker_core::{DashboardConfig, Module};
use netblocker_upstream::FirewallClient;
use tracing::info;

/// Firewall policy dashboard server.
#[derive(Parser, Debug)]
#[command(name = "netblockerd", about = "Firewall policy dashboard server")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file, default 0.0.0.0:5173).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            DashboardConfig::load(path)?
        }
        None => DashboardConfig::default(),
    }
    .apply_env();
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    config.verify()?;

    let client = FirewallClient::new(config.backend_base())
        .map_err(|e| anyhow::anyhow!("invalid backend URL: {}", e))?;
    info!("Upstream firewall API at {}", client.base_url());

    let firewall_module = firewall::FirewallModule::new(client);
    info!("Firewall module initialized");

    let module_routes = vec![(firewall_module.name(), firewall_module.routes())];
    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("Dashboard listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
