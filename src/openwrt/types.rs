// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Type definitions for OpenWrt device and sensor data

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A single parse result from one source, before merging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTuple {
    pub mac: String,
    pub ip: Option<String>,
    pub hostname: Option<String>,
    pub interface: Option<String>,
    pub status: Option<String>,
}

/// A network device seen by the router, keyed by its canonical MAC address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub mac_address: String,
    pub ip_address: Option<String>,
    pub hostname: Option<String>,
    pub interface: Option<String>,
    pub status: Option<String>,
}

/// Canonical MAC -> device
pub type DeviceMapping = HashMap<String, DeviceRecord>;

/// A single sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Int(u64),
    Float(f64),
    Text(String),
}

impl SensorValue {
    /// Numeric view of the value, `None` for text readings
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

/// Sensor key -> value, rebuilt from scratch on every sensor poll
pub type SensorSnapshot = HashMap<String, SensorValue>;

/// Router operating mode
///
/// In access-point mode no DHCP server runs on the device, so lease files are never read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RouterMode {
    #[default]
    Router,
    AccessPoint,
}

impl FromStr for RouterMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "router" => Ok(Self::Router),
            "ap" | "access-point" | "access_point" => Ok(Self::AccessPoint),
            other => Err(AppError::Config(format!(
                "Unsupported router mode '{other}': expected 'router' or 'access-point'"
            ))),
        }
    }
}

impl TryFrom<String> for RouterMode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RouterMode> for String {
    fn from(mode: RouterMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for RouterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Router => f.write_str("router"),
            Self::AccessPoint => f.write_str("access-point"),
        }
    }
}

/// Group of configuration-store fields read via `uci`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NvramKind {
    Model,
    Firmware,
}

/// Availability of a router session as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Available,
    Unavailable,
}

/// Model and firmware strings read once per router
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouterInfo {
    pub model: String,
    pub firmware: String,
    pub build: String,
}

impl RouterInfo {
    /// Builds the info from `uci` results; missing fields become `unknown`
    #[must_use]
    pub fn from_nvram(model: &HashMap<String, String>, firmware: &HashMap<String, String>) -> Self {
        let field = |map: &HashMap<String, String>, key: &str| {
            map.get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        };
        Self {
            model: field(model, "model"),
            firmware: field(firmware, "firmver"),
            build: field(firmware, "buildno"),
        }
    }

    /// True when no field could be read
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.model == "unknown" && self.firmware == "unknown" && self.build == "unknown"
    }
}

/// Everything collected from one router in one cycle
#[derive(Debug, Clone)]
pub struct RouterSnapshot {
    pub router_name: String,
    pub status: SessionStatus,
    pub devices: DeviceMapping,
    pub sensors: SensorSnapshot,
}
