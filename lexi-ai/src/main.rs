//! lexi-ai - Speech assessment microservice
//!
//! Accepts read-aloud audio, transcribes it through a whisper-compatible
//! server and returns a word-by-word pronunciation analysis.

use anyhow::{Context, Result};
use clap::Parser;
use lexi_common::assessment::WordAligner;
use lexi_common::config::read_config_quietly;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use lexi_ai::services::AssessmentService;
use lexi_ai::AppState;

/// Command-line arguments for lexi-ai
#[derive(Parser, Debug)]
#[command(name = "lexi-ai")]
#[command(about = "Speech assessment microservice for LexiLift")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8001", env = "LEXI_AI_PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "LEXI_AI_HOST")]
    host: std::net::IpAddr,

    /// Path to config.toml
    #[arg(short, long, env = "LEXI_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_source) = read_config_quietly(args.config.as_deref());

    let level = &config.logging.level;
    let default_filter = format!("lexi_ai={level},lexi_common={level},tower_http={level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting lexi-ai (Speech Assessment) v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();

    let phonemizer = lexi_ai::config::build_phonemizer(&config.phonemizer);
    let transcriber = lexi_ai::config::build_transcriber(&config.transcriber)
        .context("Failed to build transcriber client")?;

    let state = AppState::new(AssessmentService::new(
        WordAligner::new(phonemizer),
        transcriber,
    ));
    let app = lexi_ai::build_router(state);

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
