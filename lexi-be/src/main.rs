//! lexi-be - Learner progress microservice
//!
//! Persists assessment and exercise sessions, maintains per-learner phoneme
//! profiles and serves lesson recommendations.

use anyhow::{Context, Result};
use clap::Parser;
use lexi_common::config::{prepare_root_folder, read_config_quietly, resolve_root_folder};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use lexi_be::AppState;

/// Command-line arguments for lexi-be
#[derive(Parser, Debug)]
#[command(name = "lexi-be")]
#[command(about = "Learner progress microservice for LexiLift")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "LEXI_BE_PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "LEXI_BE_HOST")]
    host: std::net::IpAddr,

    /// Folder holding the database (overrides env and config)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to config.toml
    #[arg(short, long, env = "LEXI_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_source) = read_config_quietly(args.config.as_deref());

    let level = &config.logging.level;
    let default_filter = format!("lexi_be={level},lexi_common={level},tower_http={level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting lexi-be (Learner Progress) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    let db_path = prepare_root_folder(&root_folder)
        .with_context(|| format!("Failed to initialize root folder {}", root_folder.display()))?;
    info!("Database: {}", db_path.display());

    let db = lexi_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let app = lexi_be::build_router(AppState::new(db));

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
