// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metric update logic for router snapshots

use crate::metrics::descriptions::{describe, native_value};
use crate::metrics::labels::{RouterInfoLabels, RouterLabels, SensorLabels};
use crate::openwrt::{RouterInfo, RouterSnapshot, SessionStatus};
use std::collections::HashSet;

use super::MetricsRegistry;

impl MetricsRegistry {
    /// Update metrics from one router's collected snapshot
    ///
    /// Sensor values are converted with their description's factor. Sensors present
    /// in the previous snapshot but missing from this one are removed, so a failed
    /// reading does not keep exporting a stale value.
    ///
    /// Router names must be unique; the previous-label bookkeeping is keyed by name.
    pub async fn update_metrics(&self, snapshot: &RouterSnapshot) {
        let router_label = RouterLabels {
            router: snapshot.router_name.clone(),
        };
        #[allow(clippy::cast_possible_wrap)]
        self.devices_connected
            .get_or_create(&router_label)
            .set(snapshot.devices.len() as i64);
        self.router_available
            .get_or_create(&router_label)
            .set(i64::from(snapshot.status == SessionStatus::Available));

        let mut current = HashSet::new();
        for (key, value) in &snapshot.sensors {
            let (unit, exported) = match describe(key) {
                Some(description) => (description.unit, native_value(description, value)),
                None => ("", value.as_f64()),
            };
            let Some(exported) = exported else {
                tracing::trace!("Sensor '{}' has no numeric value, skipping", key);
                continue;
            };
            let labels = SensorLabels {
                router: snapshot.router_name.clone(),
                sensor: key.clone(),
                unit: unit.to_string(),
            };
            self.sensor_value.get_or_create(&labels).set(exported);
            current.insert(labels);
        }

        let mut prev = self.prev_sensors.lock().await;
        if let Some(previous) = prev.get(&snapshot.router_name) {
            let stale: Vec<&SensorLabels> = previous.difference(&current).collect();
            for labels in &stale {
                self.sensor_value.remove(labels);
            }
            if !stale.is_empty() {
                tracing::debug!(
                    "Removed {} stale sensor label sets for router {}",
                    stale.len(),
                    snapshot.router_name
                );
            }
        }
        prev.insert(snapshot.router_name.clone(), current);
    }

    /// Publish model/firmware info, replacing the previous label set if it changed
    pub async fn update_router_info(&self, router_name: &str, info: &RouterInfo) {
        let labels = RouterInfoLabels {
            router: router_name.to_string(),
            model: info.model.clone(),
            firmware: info.firmware.clone(),
            build: info.build.clone(),
        };
        let mut prev = self.prev_router_info.lock().await;
        if let Some(old) = prev.get(router_name) {
            if *old != labels {
                self.router_info.remove(old);
            }
        }
        self.router_info.get_or_create(&labels).set(1);
        prev.insert(router_name.to_string(), labels);
    }
}
