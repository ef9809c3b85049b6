//! `demod`: a small demo HTTP server.
//!
//! Serves a handful of JSON endpoints under `/api` and the built frontend
//! from `--assets`.

mod api;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

/// Demo HTTP server.
#[derive(Parser, Debug)]
#[command(name = "demod", about = "Demo HTTP server")]
struct Cli {
    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:3000")]
    listen: String,

    /// Directory of static files served at `/`.
    #[arg(long = "assets", default_value = "dist")]
    assets: PathBuf,
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

    if !cli.assets.is_dir() {
        tracing::warn!("Assets directory {} does not exist", cli.assets.display());
    }
    let app = api::build_router(&cli.assets);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Demo server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
