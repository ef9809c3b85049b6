//! `netblocker`: the firewall policy CLI client.
//!
//! Keeps a bearer token in a local session file and drives the same
//! loaders and actions as the dashboard. Think of it as `kubectl` for
//! managed firewall policies.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use firewall::service::PolicyService;
use netblocker_core::{DashboardConfig, FileStorage, UserSession};
use netblocker_upstream::FirewallClient;

/// Firewall policy CLI tool.
#[derive(Parser, Debug)]
#[command(name = "netblocker", about = "Firewall policy CLI client")]
struct Cli {
    /// Base URL of the upstream firewall API
    /// (default: $PUBLIC_BACKEND_URL, then http://localhost:3000).
    #[arg(long = "backend", global = true)]
    backend: Option<String>,

    /// Path to the session file (default: ~/.netblocker/session.json).
    #[arg(long = "session", global = true)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a bearer token in the local session.
    Login {
        /// The JWT issued by the firewall API.
        #[arg(long)]
        token: String,
    },

    /// Forget the stored token.
    Logout,

    /// Show the user of the stored token.
    Whoami,

    /// List managed policies with their schedule and templates.
    List,

    /// Show one policy as JSON.
    Show {
        /// Policy name.
        name: String,
    },

    /// Delete a policy.
    Delete {
        /// Policy name.
        name: String,
    },

    /// Show version.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env();
    if let Some(backend) = cli.backend {
        config.backend_url = backend;
    }
    config.verify()?;

    let session_path = cli.session.unwrap_or_else(FileStorage::default_path);
    let storage = Arc::new(FileStorage::open(&session_path)?);
    let mut session = UserSession::init(storage)?;

    let result = run(cli.command, config.backend_base(), &mut session).await;
    finish(result, session.close())
}

/// The command's own error wins; a failed close is reported only when
/// the command succeeded.
fn finish(
    result: anyhow::Result<()>,
    closed: Result<(), netblocker_core::SessionError>,
) -> anyhow::Result<()> {
    match (result, closed) {
        (Err(e), Err(close_err)) => {
            tracing::error!("failed to close session: {}", close_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), closed) => Ok(closed?),
    }
}

async fn run(command: Commands, backend: &str, session: &mut UserSession) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();

    match command {
        Commands::Login { token } => commands::session::login(session, &token, &mut out)?,
        Commands::Logout => commands::session::logout(session, &mut out)?,
        Commands::Whoami => commands::session::whoami(session, &mut out)?,
        Commands::List => {
            let service = policy_service(backend)?;
            commands::policy::list(&service, session, &mut out).await?;
        }
        Commands::Show { name } => {
            let service = policy_service(backend)?;
            commands::policy::show(&service, session, &name, &mut out).await?;
        }
        Commands::Delete { name } => {
            let service = policy_service(backend)?;
            commands::policy::delete(&service, session, &name, &mut out).await?;
        }
        Commands::Version => {
            use std::io::Write;
            writeln!(out, "netblocker cli v{}", env!("CARGO_PKG_VERSION"))?;
        }
    }

    Ok(())
}

fn policy_service(backend: &str) -> anyhow::Result<PolicyService> {
    let client = FirewallClient::new(backend)
        .map_err(|e| anyhow::anyhow!("invalid backend URL {}: {}", backend, e))?;
    Ok(PolicyService::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use netblocker_core::SessionError;

    #[test]
    fn command_error_survives_failed_close() {
        let err = finish(
            Err(anyhow::anyhow!("Error (403 Forbidden): Failed to delete policy")),
            Err(SessionError::Storage("disk full".into())),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Error (403 Forbidden): Failed to delete policy");
    }

    #[test]
    fn close_error_reported_after_success() {
        let err = finish(Ok(()), Err(SessionError::Storage("disk full".into()))).unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(finish(Ok(()), Ok(())).is_ok());
    }
}
