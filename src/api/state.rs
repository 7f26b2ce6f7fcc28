// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Latest per-router results shared between the collector and HTTP handlers

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::openwrt::{DeviceRecord, RouterInfo, RouterSnapshot, SessionStatus};

/// What the HTTP layer knows about one router
#[derive(Debug, Clone, Serialize)]
pub struct RouterView {
    pub status: SessionStatus,
    pub info: Option<RouterInfo>,
    pub devices: Vec<DeviceRecord>,
}

/// Router name -> latest view, written by the collector
#[derive(Clone, Default)]
pub struct RouterStates {
    inner: Arc<RwLock<HashMap<String, RouterView>>>,
}

impl RouterStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a collected snapshot, sorted by MAC for stable output
    pub async fn update(&self, snapshot: &RouterSnapshot, info: Option<RouterInfo>) {
        let mut devices: Vec<DeviceRecord> = snapshot.devices.values().cloned().collect();
        devices.sort_by(|a, b| a.mac_address.cmp(&b.mac_address));
        let mut states = self.inner.write().await;
        states.insert(
            snapshot.router_name.clone(),
            RouterView {
                status: snapshot.status,
                info,
                devices,
            },
        );
    }

    pub async fn get(&self, router_name: &str) -> Option<RouterView> {
        self.inner.read().await.get(router_name).cloned()
    }

    pub async fn all(&self) -> HashMap<String, RouterView> {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openwrt::{DeviceMapping, SensorSnapshot};

    fn record(mac: &str) -> DeviceRecord {
        DeviceRecord {
            mac_address: mac.to_string(),
            ip_address: None,
            hostname: None,
            interface: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_update_sorts_devices() {
        let states = RouterStates::new();
        let devices: DeviceMapping = ["AA:00:00:00:00:02", "AA:00:00:00:00:01"]
            .into_iter()
            .map(|mac| (mac.to_string(), record(mac)))
            .collect();
        let snapshot = RouterSnapshot {
            router_name: "r1".to_string(),
            status: SessionStatus::Available,
            devices,
            sensors: SensorSnapshot::new(),
        };

        states.update(&snapshot, None).await;

        let view = states.get("r1").await.unwrap();
        assert_eq!(view.devices[0].mac_address, "AA:00:00:00:00:01");
        assert_eq!(view.devices[1].mac_address, "AA:00:00:00:00:02");
        assert!(states.get("r2").await.is_none());
        assert_eq!(states.all().await.len(), 1);
    }
}
