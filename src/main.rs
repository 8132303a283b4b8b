//! WebSocket push gateway server.
//!
//! Main entry point: parses flags, loads configuration, and serves the
//! gateway and statistics listeners until a shutdown signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use gateway_api::{AppState, build_gateway_router, build_stats_router};
use gateway_core::config::AppConfig;
use gateway_core::config::logging::LogFormat;
use gateway_core::error::AppError;
use gateway_realtime::RealtimeEngine;
use gateway_realtime::connection::authenticator::StaticAuthenticator;

/// WebSocket push gateway
#[derive(Debug, Parser)]
#[command(name = "ws-gateway", version, about, long_about = None)]
struct Args {
    /// Environment overlay to load from the config directory
    #[arg(short, long, default_value = "development")]
    env: String,

    /// Directory holding default.toml and the environment overlays
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Overrides logging.level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match AppConfig::load(&args.config_dir, &args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging(&config);
    tracing::info!(env = %args.env, config_dir = %args.config_dir, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ws-gateway v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Engine ───────────────────────────────────────────
    let authenticator = Arc::new(StaticAuthenticator::from_config(&config.auth));
    let engine = RealtimeEngine::new(config.gateway.clone(), authenticator);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config.clone(), engine.clone());

    // ── Step 2: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 3: Stats listener ───────────────────────────────────
    let stats_handle = if config.stats.enabled {
        let addr = format!("{}:{}", config.stats.host, config.stats.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;
        tracing::info!("Stats reporter listening on {}", addr);

        let app = build_stats_router(state.clone());
        let mut stats_shutdown = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = stats_shutdown.wait_for(|stop| *stop).await;
            });
            if let Err(e) = server.await {
                tracing::error!("Stats server error: {}", e);
            }
        }))
    } else {
        tracing::info!("Stats reporter disabled");
        None
    };

    // ── Step 4: Gateway listener ─────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!("Gateway listening on {}", addr);

    let app = build_gateway_router(state);
    let shutdown_engine = engine.clone();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        shutdown_engine.shutdown();
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 5: Drain ────────────────────────────────────────────
    if tokio::time::timeout(grace, drain_connections(&engine))
        .await
        .is_err()
    {
        tracing::warn!(
            remaining = engine.live_connections(),
            "Connections still open after shutdown grace period"
        );
    }
    if let Some(handle) = stats_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }

    tracing::info!("ws-gateway shut down gracefully");
    Ok(())
}

/// Waits until every WebSocket session has finished.
async fn drain_connections(engine: &RealtimeEngine) {
    while engine.live_connections() > 0 {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
