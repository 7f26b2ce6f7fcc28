// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry initialization and metric registration

use crate::metrics::labels::{RouterInfoLabels, RouterLabels, SensorLabels};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;

use super::MetricsRegistry;

impl MetricsRegistry {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let devices_connected = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "openwrt_devices_connected",
            "Number of devices known to the router after filtering",
            devices_connected.clone(),
        );
        let router_available = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "openwrt_router_available",
            "Router session availability (1=available,0=unavailable)",
            router_available.clone(),
        );
        let sensor_value = Family::<SensorLabels, Gauge<f64, AtomicU64>>::default();
        registry.register(
            "openwrt_sensor",
            "Router sensor reading, converted to the unit label",
            sensor_value.clone(),
        );
        let router_info = Family::<RouterInfoLabels, Gauge>::default();
        registry.register(
            "openwrt_router_info",
            "Static router model and firmware info (value=1)",
            router_info.clone(),
        );

        let scrape_success = Family::<RouterLabels, Counter>::default();
        registry.register(
            "openwrt_scrape_success",
            "Number of successful router polls",
            scrape_success.clone(),
        );
        let scrape_errors = Family::<RouterLabels, Counter>::default();
        registry.register(
            "openwrt_scrape_errors",
            "Number of router polls where no device source answered",
            scrape_errors.clone(),
        );
        let scrape_duration_milliseconds = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "openwrt_scrape_duration_milliseconds",
            "Duration of last router poll in milliseconds",
            scrape_duration_milliseconds.clone(),
        );
        let collection_cycle_duration_milliseconds = Gauge::default();
        registry.register(
            "openwrt_collection_cycle_duration_milliseconds",
            "Duration of full collection cycle in milliseconds",
            collection_cycle_duration_milliseconds.clone(),
        );

        Self {
            registry: Arc::new(Mutex::new(registry)),
            devices_connected,
            router_available,
            sensor_value,
            router_info,
            scrape_success,
            scrape_errors,
            scrape_duration_milliseconds,
            collection_cycle_duration_milliseconds,
            prev_sensors: Arc::new(Mutex::new(HashMap::new())),
            prev_router_info: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}
