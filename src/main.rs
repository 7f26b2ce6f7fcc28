// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use std::net::SocketAddr;
use std::sync::Arc;

use openwrt_exporter::{
    AppState, Config, MetricsRegistry, OpenWrtRouter, Result, RouterConfig, RouterStates,
    SshConnection, create_router, start_collection_loop,
};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    setup_tracing();

    let config = Config::from_env()?;

    tracing::info!(
        "Loaded configuration for {} router(s)",
        config.routers.len()
    );
    for router in &config.routers {
        tracing::info!(
            "  - Router '{}' at {}@{}:{} ({} mode)",
            router.name,
            router.username,
            router.host,
            router.port,
            router.options.mode
        );
    }

    let routers = config
        .routers
        .iter()
        .map(build_session)
        .collect::<Result<Vec<_>>>()?;

    let metrics = MetricsRegistry::new();
    let states = RouterStates::new();

    let state = Arc::new(AppState {
        config: config.clone(),
        metrics: metrics.clone(),
        routers: states.clone(),
    });

    // Graceful shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let collector = start_collection_loop(
        shutdown_rx.clone(),
        Arc::new(config.clone()),
        routers,
        metrics,
        states,
    );

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("OpenWrt Exporter starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /health  - Health check");
    tracing::info!("  - GET /metrics - Prometheus metrics");
    tracing::info!("  - GET /devices - Connected devices");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.clone().changed().await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    let _ = collector.await;
    Ok(())
}

fn build_session(router: &RouterConfig) -> Result<Arc<OpenWrtRouter<SshConnection>>> {
    let conn = SshConnection::new(
        router.host.clone(),
        router.port,
        router.username.clone(),
        router.ssh_key.clone(),
    );
    Ok(Arc::new(OpenWrtRouter::new(
        router.name.clone(),
        conn,
        router.options.clone(),
    )?))
}

fn setup_tracing() {
    // RUST_LOG wins; "info" otherwise
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
