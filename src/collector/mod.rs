// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics collection orchestration module for OpenWrt routers
//!
//! Runs the periodic poll of every router session and publishes the results.

mod cache;
mod router_task;

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::RouterStates;
use crate::config::Config;
use crate::metrics::{MetricsRegistry, RouterLabels};
use crate::openwrt::{CommandRunner, OpenWrtRouter};

use cache::RouterInfoCache;

/// Starts the background metrics collection loop
///
/// Spawns a background task that periodically polls all router sessions.
/// The collection interval is configurable via `Config::collection_interval_secs`.
/// Routers within a cycle are polled concurrently; the next cycle waits for all of them.
pub fn start_collection_loop<C: CommandRunner>(
    mut shutdown_rx: watch::Receiver<bool>,
    config: Arc<Config>,
    routers: Vec<Arc<OpenWrtRouter<C>>>,
    metrics: MetricsRegistry,
    states: RouterStates,
) -> JoinHandle<()> {
    let interval = config.collection_interval_secs;
    tracing::info!("Starting background collection loop every {}s", interval);

    let info_cache = RouterInfoCache::new();
    for router in &routers {
        metrics.initialize_router_metrics(&RouterLabels {
            router: router.name().to_string(),
        });
    }

    tracing::trace!("Collection loop initialized with {} routers", routers.len());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval));

        loop {
            tokio::select! {
                _ = ticker.tick() => {},
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Stopping collection loop");
                        break;
                    }
                }
            }

            let cycle_start = std::time::Instant::now();

            let tasks: Vec<_> = routers
                .iter()
                .map(|router| {
                    router_task::spawn_router_collection(
                        router.clone(),
                        metrics.clone(),
                        info_cache.clone(),
                        states.clone(),
                    )
                })
                .collect();

            for result in futures_util::future::join_all(tasks).await {
                if let Err(e) = result {
                    tracing::error!("Router collection task failed: {}", e);
                }
            }

            metrics.record_collection_cycle_duration(cycle_start.elapsed().as_secs_f64());
        }
    })
}
