// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Router status readings: model/firmware, traffic counters, load and temperatures

use std::collections::HashMap;
use tokio::time::Instant;

use super::connection::{CommandRunner, Runner};
use super::types::{NvramKind, SensorSnapshot, SensorValue};
use crate::error::CommandError;

pub const SENSOR_DEVICES_CONNECTED: &str = "devices_connected";
pub const SENSOR_DOWNLOAD_BYTES: &str = "download_bytes";
pub const SENSOR_UPLOAD_BYTES: &str = "upload_bytes";
pub const SENSOR_DOWNLOAD_RATE: &str = "download_rate_bytes";
pub const SENSOR_UPLOAD_RATE: &str = "upload_rate_bytes";
pub const SENSOR_LOAD_AVG: [&str; 3] = ["load_avg_1m", "load_avg_5m", "load_avg_15m"];
pub const SENSOR_TEMP_2_4GHZ: &str = "temp_2_4ghz";
pub const SENSOR_TEMP_5GHZ: &str = "temp_5ghz";
pub const SENSOR_TEMP_CPU: &str = "temp_cpu";

const LOADAVG_COMMAND: &str = "cat /proc/loadavg";

/// Temperature sources: sensor key and command printing millidegrees Celsius
const TEMPERATURE_COMMANDS: [(&str, &str); 3] = [
    (
        SENSOR_TEMP_2_4GHZ,
        "cat /sys/class/ieee80211/phy0/hwmon*/temp1_input",
    ),
    (
        SENSOR_TEMP_5GHZ,
        "cat /sys/class/ieee80211/phy1/hwmon*/temp1_input",
    ),
    (SENSOR_TEMP_CPU, "cat /sys/class/thermal/thermal_zone0/temp"),
];

/// `uci` queries per field group: result key and command
fn nvram_queries(kind: NvramKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        NvramKind::Model => &[("model", "uci get env.var.prod_friendly_name")],
        NvramKind::Firmware => &[
            ("firmver", "uci get version.@version[0].marketing_name"),
            ("buildno", "uci get version.@version[0].marketing_version"),
        ],
    }
}

/// Outcome of a configuration-store read, one entry per sub-query
#[derive(Debug, Default)]
pub struct NvramReport {
    pub values: HashMap<String, String>,
    pub failed: Vec<(String, CommandError)>,
}

impl NvramReport {
    /// Keys of the sub-queries that failed
    #[must_use]
    pub fn failed_keys(&self) -> Vec<&str> {
        self.failed.iter().map(|(key, _)| key.as_str()).collect()
    }
}

/// Byte counters of the WAN interface at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrafficSample {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub at: Instant,
}

impl TrafficSample {
    /// Bytes per second since `previous`, `None` on counter reset or no elapsed time
    pub(crate) fn rates_since(&self, previous: &TrafficSample) -> Option<(f64, f64)> {
        let elapsed = self.at.saturating_duration_since(previous.at).as_secs_f64();
        if elapsed <= 0.0 || self.rx_bytes < previous.rx_bytes || self.tx_bytes < previous.tx_bytes
        {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rx = (self.rx_bytes - previous.rx_bytes) as f64 / elapsed;
        #[allow(clippy::cast_precision_loss)]
        let tx = (self.tx_bytes - previous.tx_bytes) as f64 / elapsed;
        Some((rx, tx))
    }
}

pub(crate) fn traffic_command(interface: &str) -> String {
    format!(
        "cat /sys/class/net/{interface}/statistics/rx_bytes /sys/class/net/{interface}/statistics/tx_bytes"
    )
}

/// Parse the two-line rx/tx counter output
pub(crate) fn parse_counters(text: &str) -> Option<(u64, u64)> {
    let mut values = text.split_whitespace().map(str::parse::<u64>);
    let rx = values.next()?.ok()?;
    let tx = values.next()?.ok()?;
    Some((rx, tx))
}

/// Parse `/proc/loadavg` into the 1, 5 and 15 minute averages
pub(crate) fn parse_loadavg(text: &str) -> Option<[f64; 3]> {
    let mut fields = text.split_whitespace().map(str::parse::<f64>);
    Some([
        fields.next()?.ok()?,
        fields.next()?.ok()?,
        fields.next()?.ok()?,
    ])
}

/// First millidegree reading in `text`, converted to degrees Celsius
pub(crate) fn parse_millidegrees(text: &str) -> Option<f64> {
    text.split_whitespace()
        .find_map(|v| v.parse::<i64>().ok())
        .map(|milli| {
            #[allow(clippy::cast_precision_loss)]
            let celsius = milli as f64 / 1000.0;
            celsius
        })
}

/// Run every `uci` sub-query of `kind`, keeping whatever succeeds
pub(crate) async fn read_nvram<C: CommandRunner>(
    runner: &Runner<C>,
    kind: NvramKind,
) -> NvramReport {
    let mut report = NvramReport::default();
    for (key, command) in nvram_queries(kind) {
        match runner.run(command).await {
            Ok(value) => {
                report
                    .values
                    .insert((*key).to_string(), value.trim().to_string());
            }
            Err(e) => {
                tracing::warn!("Failed to read '{}' via uci: {}", key, e);
                report.failed.push(((*key).to_string(), e));
            }
        }
    }
    report
}

/// Read the WAN byte counters
pub(crate) async fn read_traffic<C: CommandRunner>(
    runner: &Runner<C>,
    interface: &str,
) -> Option<TrafficSample> {
    let text = runner.run_or_empty("traffic", &traffic_command(interface)).await?;
    let Some((rx_bytes, tx_bytes)) = parse_counters(&text) else {
        tracing::debug!("Unexpected counter output for {}: {:?}", interface, text);
        return None;
    };
    Some(TrafficSample {
        rx_bytes,
        tx_bytes,
        at: Instant::now(),
    })
}

/// Insert load averages into `snapshot`
pub(crate) async fn collect_load_avg<C: CommandRunner>(
    runner: &Runner<C>,
    snapshot: &mut SensorSnapshot,
) {
    let Some(text) = runner.run_or_empty("loadavg", LOADAVG_COMMAND).await else {
        return;
    };
    match parse_loadavg(&text) {
        Some(values) => {
            for (key, value) in SENSOR_LOAD_AVG.iter().zip(values) {
                snapshot.insert((*key).to_string(), SensorValue::Float(value));
            }
        }
        None => tracing::debug!("Unexpected loadavg output: {:?}", text),
    }
}

/// Insert every temperature zone that can be read into `snapshot`
pub(crate) async fn collect_temperatures<C: CommandRunner>(
    runner: &Runner<C>,
    snapshot: &mut SensorSnapshot,
) {
    for (key, command) in TEMPERATURE_COMMANDS {
        let Some(text) = runner.run_or_empty(key, command).await else {
            continue;
        };
        if let Some(celsius) = parse_millidegrees(&text) {
            snapshot.insert(key.to_string(), SensorValue::Float(celsius));
        }
    }
}
