//! FNOL claim intake - API server binary
//!
//! # Environment Variables
//!
//! * `FNOL_CONFIG` - Path to a JSON config file (default: built-in defaults)
//! * `FNOL_HOST` - Server host, overrides `server.host`
//! * `FNOL_PORT` - Server port, overrides `server.port`
//! * `FNOL_LOG` - Log filter, overrides `server.log_level` (`RUST_LOG` takes precedence)

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fnol_api::{create_router, AppState};
use fnol_core::FnolConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(&config.server.log_level);

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        storage = ?config.storage.backend,
        "Starting FNOL claim intake API server"
    );

    let state = AppState::from_config(&config).context("Failed to initialize application state")?;
    let app = create_router(state);

    let addr: SocketAddr = config
        .server
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Config file from `FNOL_CONFIG` (or defaults), then env overrides.
fn load_config() -> anyhow::Result<FnolConfig> {
    let mut config = match std::env::var("FNOL_CONFIG") {
        Ok(path) => FnolConfig::from_file(Path::new(&path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => FnolConfig::default(),
    };

    if let Ok(host) = std::env::var("FNOL_HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("FNOL_PORT") {
        config.server.port = port
            .parse()
            .with_context(|| format!("Invalid FNOL_PORT: {}", port))?;
    }
    if let Ok(level) = std::env::var("FNOL_LOG") {
        config.server.log_level = level;
    }

    Ok(config)
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
