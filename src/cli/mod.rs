use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use crate::config::{self, AppConfig};
use crate::database::{schema, DatabaseManager};
use crate::router;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "devcamper")]
#[command(about = "DevCamper API - bootcamp directory REST server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Create or update the database schema and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config().clone();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    if config.database.migrate_on_start {
        schema::migrate(&pool).await.context("schema bootstrap failed")?;
    }

    let port = port.unwrap_or(config.api.port);
    let environment = config.environment;
    let state = AppState::new(pool.clone(), config).context("invalid configuration")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("DevCamper API ({:?}) listening on http://{}", environment, addr);

    let served = axum::serve(listener, router::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    DatabaseManager::close(&pool).await;
    served.context("server terminated with an error")
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let migrated = schema::migrate(&pool).await;
    DatabaseManager::close(&pool).await;
    migrated.context("schema bootstrap failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
