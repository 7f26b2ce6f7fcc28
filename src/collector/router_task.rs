// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Per-router collection task

use std::sync::Arc;

use crate::api::RouterStates;
use crate::metrics::{MetricsRegistry, RouterLabels};
use crate::openwrt::{
    CommandRunner, NvramKind, OpenWrtRouter, RouterInfo, RouterSnapshot, SessionStatus,
};

use super::cache::RouterInfoCache;

pub(super) fn spawn_router_collection<C: CommandRunner>(
    router: Arc<OpenWrtRouter<C>>,
    metrics: MetricsRegistry,
    info_cache: RouterInfoCache,
    states: RouterStates,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        collect_router(&router, &metrics, &info_cache, &states).await;
    })
}

/// One collection pass: sensors, devices, then router info on first success
pub(super) async fn collect_router<C: CommandRunner>(
    router: &OpenWrtRouter<C>,
    metrics: &MetricsRegistry,
    info_cache: &RouterInfoCache,
    states: &RouterStates,
) {
    let router_name = router.name().to_string();
    let router_label = RouterLabels {
        router: router_name.clone(),
    };

    tracing::trace!("Starting collection for router: {}", router_name);
    let start = std::time::Instant::now();

    let sensors = router.poll_sensors().await;
    let devices = router.poll_devices(false).await;
    let report = router.session_report().await;
    let duration = start.elapsed().as_secs_f64();

    if report.consecutive_failures == 0 {
        metrics.record_scrape_success(&router_label);
    } else {
        metrics.record_scrape_error(&router_label);
        let last_success = report
            .seconds_since_success
            .map_or_else(|| "never".to_string(), |secs| format!("{secs}s ago"));
        tracing::warn!(
            "Failed to poll devices for {} in {:.3}s ({} consecutive failures, last success {})",
            router_name,
            duration,
            report.consecutive_failures,
            last_success
        );
    }
    metrics.record_scrape_duration(&router_label, duration);

    let info = match info_cache.get(&router_name).await {
        Some(info) => Some(info),
        None if report.status == SessionStatus::Available => {
            let info = fetch_router_info(router).await;
            if info.is_unknown() {
                None
            } else {
                info_cache.set(router_name.clone(), info.clone()).await;
                Some(info)
            }
        }
        None => None,
    };
    if let Some(info) = &info {
        metrics.update_router_info(&router_name, info).await;
    }

    let snapshot = RouterSnapshot {
        router_name: router_name.clone(),
        status: report.status,
        devices,
        sensors,
    };
    metrics.update_metrics(&snapshot).await;
    states.update(&snapshot, info).await;

    tracing::debug!(
        "Collected router {} in {:.3}s: {} devices, {} sensors",
        router_name,
        duration,
        snapshot.devices.len(),
        snapshot.sensors.len()
    );
}

async fn fetch_router_info<C: CommandRunner>(router: &OpenWrtRouter<C>) -> RouterInfo {
    let model = router.get_nvram_report(NvramKind::Model).await;
    let firmware = router.get_nvram_report(NvramKind::Firmware).await;
    for (key, error) in model.failed.iter().chain(firmware.failed.iter()) {
        tracing::debug!("Router '{}': nvram key '{}' failed: {}", router.name(), key, error);
    }
    RouterInfo::from_nvram(&model.values, &firmware.values)
}
