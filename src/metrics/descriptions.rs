// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! How each sensor is presented: display name, unit, and divisor

use crate::openwrt::{
    SENSOR_DEVICES_CONNECTED, SENSOR_DOWNLOAD_BYTES, SENSOR_DOWNLOAD_RATE, SENSOR_LOAD_AVG,
    SENSOR_TEMP_2_4GHZ, SENSOR_TEMP_5GHZ, SENSOR_TEMP_CPU, SENSOR_UPLOAD_BYTES, SENSOR_UPLOAD_RATE,
    SensorValue,
};

/// Presentation of one sensor key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    /// Raw value is divided by this before export
    pub factor: Option<u64>,
}

/// Bytes/s to Mbit/s
const RATE_FACTOR: u64 = 125_000;

/// Bytes to GB
const BYTES_FACTOR: u64 = 1_000_000_000;

pub const SENSOR_DESCRIPTIONS: &[SensorDescription] = &[
    SensorDescription {
        key: SENSOR_DEVICES_CONNECTED,
        name: "Devices Connected",
        unit: "devices",
        factor: None,
    },
    SensorDescription {
        key: SENSOR_DOWNLOAD_RATE,
        name: "Download Speed",
        unit: "Mbit/s",
        factor: Some(RATE_FACTOR),
    },
    SensorDescription {
        key: SENSOR_UPLOAD_RATE,
        name: "Upload Speed",
        unit: "Mbit/s",
        factor: Some(RATE_FACTOR),
    },
    SensorDescription {
        key: SENSOR_DOWNLOAD_BYTES,
        name: "Download",
        unit: "GB",
        factor: Some(BYTES_FACTOR),
    },
    SensorDescription {
        key: SENSOR_UPLOAD_BYTES,
        name: "Upload",
        unit: "GB",
        factor: Some(BYTES_FACTOR),
    },
    SensorDescription {
        key: SENSOR_LOAD_AVG[0],
        name: "Load Avg (1m)",
        unit: "",
        factor: None,
    },
    SensorDescription {
        key: SENSOR_LOAD_AVG[1],
        name: "Load Avg (5m)",
        unit: "",
        factor: None,
    },
    SensorDescription {
        key: SENSOR_LOAD_AVG[2],
        name: "Load Avg (15m)",
        unit: "",
        factor: None,
    },
    SensorDescription {
        key: SENSOR_TEMP_2_4GHZ,
        name: "2.4GHz Temperature",
        unit: "celsius",
        factor: None,
    },
    SensorDescription {
        key: SENSOR_TEMP_5GHZ,
        name: "5GHz Temperature",
        unit: "celsius",
        factor: None,
    },
    SensorDescription {
        key: SENSOR_TEMP_CPU,
        name: "CPU Temperature",
        unit: "celsius",
        factor: None,
    },
];

/// Looks up the description of `key`
#[must_use]
pub fn describe(key: &str) -> Option<&'static SensorDescription> {
    SENSOR_DESCRIPTIONS.iter().find(|d| d.key == key)
}

/// Exported value of a reading; text readings and a zero factor yield `None`
#[must_use]
pub fn native_value(description: &SensorDescription, value: &SensorValue) -> Option<f64> {
    let raw = value.as_f64()?;
    match description.factor {
        #[allow(clippy::cast_precision_loss)]
        Some(factor) if factor > 0 => Some(raw / factor as f64),
        Some(_) => None,
        None => Some(raw),
    }
}
