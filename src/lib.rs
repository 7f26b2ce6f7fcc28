// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # OpenWrt Exporter
//!
//! Device and sensor poller for OpenWrt routers.
//!
//! This library runs shell commands on OpenWrt routers over SSH, merges ARP,
//! neighbor and DHCP lease data into a per-MAC device list, reads status
//! sensors and exposes everything in Prometheus format.
//!
//! ## Main modules
//! - `api`: HTTP API handlers
//! - `collector`: periodic polling of all router sessions
//! - `config`: configuration management
//! - `error`: error types
//! - `metrics`: sensor descriptions and Prometheus registry
//! - `openwrt`: router sessions, parsing, reconciliation and caching
//! - `prelude`: commonly used types and traits

mod api;
mod collector;
mod config;
mod error;
mod metrics;
mod openwrt;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, RouterConfig, RouterOptions};

/// Application error and result type
pub use error::{AppError, CommandError, Result};

/// HTTP API router and state
pub use api::{AppState, RouterStates, RouterView, create_router};

/// Metrics collection loop
pub use collector::start_collection_loop;

/// Metrics registry, labels and sensor descriptions
pub use metrics::{MetricsRegistry, RouterLabels, SensorDescription, describe};

/// OpenWrt router sessions and their data types
pub use openwrt::{
    CacheEntry, CommandRunner, DeviceMapping, DeviceRecord, Dialect, NvramKind, NvramReport,
    OpenWrtRouter, RawTuple, RouterInfo, RouterMode, RouterSnapshot, SensorSnapshot, SensorValue,
    SessionReport, SessionStatus, SourcePattern, SshConnection, canonical_mac, filter, parse_arp,
    parse_leases, parse_neigh, reconcile,
};
