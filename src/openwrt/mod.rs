// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! OpenWrt router polling module
//!
//! This module runs shell commands on OpenWrt routers, parses their ARP, neighbor and
//! DHCP lease output into device records, and reads status sensors.

mod cache;
mod connection;
mod health;
mod parse;
mod reconcile;
mod router;
mod sensors;
mod types;

// Re-export public types and functions
pub use cache::CacheEntry;
pub use connection::{CommandRunner, SshConnection};
pub use parse::{Dialect, SourcePattern, canonical_mac, parse_arp, parse_leases, parse_neigh};
pub use reconcile::{filter, reconcile};
pub use router::{OpenWrtRouter, SessionReport};
pub use sensors::{
    NvramReport, SENSOR_DEVICES_CONNECTED, SENSOR_DOWNLOAD_BYTES, SENSOR_DOWNLOAD_RATE,
    SENSOR_LOAD_AVG, SENSOR_TEMP_2_4GHZ, SENSOR_TEMP_5GHZ, SENSOR_TEMP_CPU, SENSOR_UPLOAD_BYTES,
    SENSOR_UPLOAD_RATE,
};
pub use types::{
    DeviceMapping, DeviceRecord, NvramKind, RawTuple, RouterInfo, RouterMode, RouterSnapshot,
    SensorSnapshot, SensorValue, SessionStatus,
};
