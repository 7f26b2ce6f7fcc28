// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update module for OpenWrt Exporter
//!
//! Contains label types, sensor descriptions, and the Prometheus metrics registry.

mod descriptions;
mod labels;
mod registry;

/// Sensor presentation table and unit conversion
pub use descriptions::{SENSOR_DESCRIPTIONS, SensorDescription, describe};

/// Labels for routers, sensors, and router info
pub use labels::{RouterInfoLabels, RouterLabels, SensorLabels};

/// Prometheus metrics registry
pub use registry::MetricsRegistry;
