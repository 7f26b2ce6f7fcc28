// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use openwrt_exporter::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, RouterConfig, RouterOptions};
pub use crate::error::{AppError, CommandError, Result};

// Metrics types
pub use crate::metrics::{
    MetricsRegistry, RouterInfoLabels, RouterLabels, SENSOR_DESCRIPTIONS, SensorLabels,
};

// OpenWrt sessions
pub use crate::openwrt::{
    CommandRunner, DeviceMapping, DeviceRecord, Dialect, NvramKind, OpenWrtRouter, RouterInfo,
    RouterMode, SensorSnapshot, SensorValue, SessionStatus, SshConnection,
};
