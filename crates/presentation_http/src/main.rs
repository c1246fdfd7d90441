//! Faultline HTTP Server
//!
//! Main entry point for the server hosting the failure-creation endpoint.

use std::{future::IntoFuture, sync::Arc};

use application::FailureRegistry;
use infrastructure::{AppConfig, MokaCache, SystemClock};
use presentation_http::{routes, shutdown::run_until_drained, state::AppState, telemetry};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the log format can be honoured
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Initialize tracing
    let json_logs = config.server.json_logs();
    tracing_subscriber::registry()
        .with(telemetry::env_filter())
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    info!("Faultline v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = &loaded {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        admin_path = %config.simulation.admin_path,
        simulation_enabled = config.simulation.enabled,
        "Configuration loaded"
    );

    // Backing store and registry
    let store = Arc::new(MokaCache::with_config(config.cache.into()));
    let registry = FailureRegistry::new(store, Arc::new(SystemClock));

    let state = AppState {
        registry,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    // Graceful shutdown, bounded by the configured grace period
    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    run_until_drained(server, signalled_rx, config.server.shutdown_timeout()).await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
