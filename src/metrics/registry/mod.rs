// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update logic

mod init;
mod scrape;
mod update;

use crate::metrics::labels::{RouterInfoLabels, RouterLabels, SensorLabels};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Mutex<Registry>>,
    // gauges
    devices_connected: Family<RouterLabels, Gauge>,
    router_available: Family<RouterLabels, Gauge>,
    sensor_value: Family<SensorLabels, Gauge<f64, AtomicU64>>,
    router_info: Family<RouterInfoLabels, Gauge>,
    // scrape status counters
    scrape_success: Family<RouterLabels, Counter>,
    scrape_errors: Family<RouterLabels, Counter>,
    // scrape timing metrics
    scrape_duration_milliseconds: Family<RouterLabels, Gauge>,
    collection_cycle_duration_milliseconds: Gauge,
    prev_sensors: Arc<Mutex<HashMap<String, HashSet<SensorLabels>>>>,
    prev_router_info: Arc<Mutex<HashMap<String, RouterInfoLabels>>>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openwrt::{
        DeviceMapping, DeviceRecord, RouterInfo, RouterSnapshot, SensorSnapshot, SensorValue,
        SessionStatus,
    };

    fn make_snapshot(router_name: &str, devices: usize, sensors: SensorSnapshot) -> RouterSnapshot {
        let devices: DeviceMapping = (0..devices)
            .map(|i| {
                let mac = format!("AA:BB:CC:DD:EE:{i:02X}");
                (
                    mac.clone(),
                    DeviceRecord {
                        mac_address: mac,
                        ip_address: Some(format!("192.168.1.{}", i + 10)),
                        hostname: None,
                        interface: None,
                        status: None,
                    },
                )
            })
            .collect();
        RouterSnapshot {
            router_name: router_name.to_string(),
            status: SessionStatus::Available,
            devices,
            sensors,
        }
    }

    fn sensor_labels(router: &str, sensor: &str, unit: &str) -> SensorLabels {
        SensorLabels {
            router: router.to_string(),
            sensor: sensor.to_string(),
            unit: unit.to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_metrics_sets_devices_and_availability() {
        let registry = MetricsRegistry::new();
        registry
            .update_metrics(&make_snapshot("router1", 3, SensorSnapshot::new()))
            .await;

        let labels = RouterLabels {
            router: "router1".to_string(),
        };
        assert_eq!(registry.devices_connected.get_or_create(&labels).get(), 3);
        assert_eq!(registry.router_available.get_or_create(&labels).get(), 1);
    }

    #[tokio::test]
    async fn test_update_metrics_applies_factor() {
        let registry = MetricsRegistry::new();
        let sensors = SensorSnapshot::from([
            (
                "download_rate_bytes".to_string(),
                SensorValue::Float(1_250_000.0),
            ),
            ("load_avg_1m".to_string(), SensorValue::Float(0.5)),
        ]);
        registry
            .update_metrics(&make_snapshot("router1", 0, sensors))
            .await;

        let rate = sensor_labels("router1", "download_rate_bytes", "Mbit/s");
        assert!((registry.sensor_value.get_or_create(&rate).get() - 10.0).abs() < f64::EPSILON);
        let load = sensor_labels("router1", "load_avg_1m", "");
        assert!((registry.sensor_value.get_or_create(&load).get() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_sensor_is_removed() {
        let registry = MetricsRegistry::new();
        let first = SensorSnapshot::from([
            ("temp_cpu".to_string(), SensorValue::Float(48.0)),
            ("load_avg_1m".to_string(), SensorValue::Float(0.1)),
        ]);
        registry
            .update_metrics(&make_snapshot("router1", 0, first))
            .await;

        let second = SensorSnapshot::from([("load_avg_1m".to_string(), SensorValue::Float(0.2))]);
        registry
            .update_metrics(&make_snapshot("router1", 0, second))
            .await;

        let encoded = registry.encode_metrics().await.unwrap();
        assert!(!encoded.contains("temp_cpu"));
        assert!(encoded.contains("load_avg_1m"));
    }

    #[tokio::test]
    async fn test_router_info_label_replaced_on_change() {
        let registry = MetricsRegistry::new();
        let mut info = RouterInfo {
            model: "Archer C7".to_string(),
            firmware: "OpenWrt".to_string(),
            build: "23.05.2".to_string(),
        };
        registry.update_router_info("router1", &info).await;
        info.build = "23.05.3".to_string();
        registry.update_router_info("router1", &info).await;

        let encoded = registry.encode_metrics().await.unwrap();
        assert!(encoded.contains("23.05.3"));
        assert!(!encoded.contains("23.05.2"));
    }

    #[tokio::test]
    async fn test_encode_metrics_contains_expected_names() {
        let registry = MetricsRegistry::new();
        let sensors = SensorSnapshot::from([("temp_cpu".to_string(), SensorValue::Float(51.0))]);
        registry
            .update_metrics(&make_snapshot("router1", 2, sensors))
            .await;

        let encoded = registry.encode_metrics().await.unwrap();
        assert!(encoded.contains("openwrt_devices_connected"));
        assert!(encoded.contains("openwrt_router_available"));
        assert!(encoded.contains("openwrt_sensor"));
        assert!(encoded.contains("router=\"router1\""));
    }

    #[tokio::test]
    async fn test_scrape_counters() {
        let registry = MetricsRegistry::new();
        let labels = RouterLabels {
            router: "router1".to_string(),
        };
        registry.initialize_router_metrics(&labels);
        assert_eq!(registry.get_scrape_success_count(&labels), 0);

        registry.record_scrape_success(&labels);
        registry.record_scrape_success(&labels);
        registry.record_scrape_error(&labels);

        assert_eq!(registry.get_scrape_success_count(&labels), 2);
        assert_eq!(registry.get_scrape_error_count(&labels), 1);
    }
}
