// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Polling engine for one OpenWrt router session

use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use super::cache::CacheEntry;
use super::connection::{CommandRunner, Runner};
use super::health::SessionHealth;
use super::parse::{Dialect, parse_lease_lines};
use super::reconcile::{filter, reconcile};
use super::sensors::{
    self, NvramReport, SENSOR_DEVICES_CONNECTED, SENSOR_DOWNLOAD_BYTES, SENSOR_DOWNLOAD_RATE,
    SENSOR_UPLOAD_BYTES, SENSOR_UPLOAD_RATE, TrafficSample,
};
use super::types::{
    DeviceMapping, NvramKind, RouterMode, SensorSnapshot, SensorValue, SessionStatus,
};
use crate::config::RouterOptions;
use crate::error::Result;

/// Health summary of a router session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub status: SessionStatus,
    pub consecutive_failures: u32,
    pub seconds_since_success: Option<u64>,
}

/// OpenWrt router session
///
/// Owns the connection, the device cache and the last traffic sample. Remote calls
/// are strictly sequential; device refreshes are single-flight.
pub struct OpenWrtRouter<C> {
    name: String,
    runner: Runner<C>,
    dialect: Dialect,
    options: RwLock<RouterOptions>,
    cache: Mutex<Option<CacheEntry>>,
    traffic: Mutex<Option<TrafficSample>>,
    health: Mutex<SessionHealth>,
}

impl<C: CommandRunner> OpenWrtRouter<C> {
    /// Creates a session using the stock OpenWrt dialect
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `options` are invalid.
    pub fn new(name: impl Into<String>, conn: C, options: RouterOptions) -> Result<Self> {
        Self::with_dialect(name, conn, options, Dialect::openwrt())
    }

    /// Creates a session with custom commands and line patterns
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `options` are invalid.
    pub fn with_dialect(
        name: impl Into<String>,
        conn: C,
        options: RouterOptions,
        dialect: Dialect,
    ) -> Result<Self> {
        options.validate()?;
        let name = name.into();
        tracing::debug!(
            "Router '{}' using dialect '{}' in {} mode",
            name,
            dialect.name,
            options.mode
        );
        Ok(Self {
            name,
            runner: Runner::new(conn, options.command_timeout()),
            dialect,
            options: RwLock::new(options),
            cache: Mutex::new(None),
            traffic: Mutex::new(None),
            health: Mutex::new(SessionHealth::default()),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current options
    pub async fn options(&self) -> RouterOptions {
        self.options.read().await.clone()
    }

    /// Returns the connected devices, from cache when fresh
    ///
    /// With `force_refresh` the cache is bypassed. The check and the refresh run under
    /// one lock, so concurrent callers share a single remote poll.
    pub async fn poll_devices(&self, force_refresh: bool) -> DeviceMapping {
        let mut cache = self.cache.lock().await;

        if !force_refresh {
            if let Some(entry) = cache.as_ref() {
                if !entry.is_stale(Instant::now()) {
                    tracing::debug!(
                        "Router '{}': serving {} cached devices",
                        self.name,
                        entry.mapping.len()
                    );
                    return entry.mapping.clone();
                }
            }
        }

        let options = self.options.read().await.clone();
        let start = Instant::now();
        let Some(mapping) = self.poll_cycle(&options).await else {
            self.health.lock().await.record_failure();
            tracing::warn!(
                "Router '{}': every device source failed, keeping previous result",
                self.name
            );
            return cache
                .as_ref()
                .map(|entry| entry.mapping.clone())
                .unwrap_or_default();
        };
        self.health.lock().await.record_success();

        let mapping = filter(mapping, options.require_ip);
        tracing::debug!(
            "Router '{}': polled {} devices in {:.3}s",
            self.name,
            mapping.len(),
            start.elapsed().as_secs_f64()
        );
        *cache = Some(CacheEntry::new(mapping.clone(), Instant::now(), options.ttl()));
        mapping
    }

    /// Run every device source in priority order and merge the results
    ///
    /// Returns `None` when no source could be read at all.
    async fn poll_cycle(&self, options: &RouterOptions) -> Option<DeviceMapping> {
        let arp = self.runner.run_or_empty("arp", &self.dialect.arp.command).await;
        let neigh = self
            .runner
            .run_or_empty("neigh", &self.dialect.neigh.command)
            .await;
        let leases = match options.mode {
            RouterMode::AccessPoint => {
                tracing::trace!("Router '{}': access-point mode, skipping leases", self.name);
                None
            }
            RouterMode::Router => {
                let command = self.dialect.leases_command(&options.leases_path);
                self.runner.run_or_empty("leases", &command).await
            }
        };

        if arp.is_none() && neigh.is_none() && leases.is_none() {
            return None;
        }

        let mut devices = DeviceMapping::new();
        if let Some(text) = &arp {
            devices = reconcile(devices, self.dialect.arp.parse(text));
        }
        if let Some(text) = &neigh {
            devices = reconcile(devices, self.dialect.neigh.parse(text));
        }
        if let Some(text) = &leases {
            devices = reconcile(devices, parse_lease_lines(&self.dialect.leases.pattern, text));
        }
        Some(devices)
    }

    /// Builds a fresh sensor snapshot
    ///
    /// Each reading is independent; the ones that fail are simply absent.
    pub async fn poll_sensors(&self) -> SensorSnapshot {
        let mut snapshot = SensorSnapshot::new();

        let devices = self.poll_devices(false).await;
        snapshot.insert(
            SENSOR_DEVICES_CONNECTED.to_string(),
            SensorValue::Int(devices.len() as u64),
        );

        let interface = self.options.read().await.interface.clone();
        if let Some(sample) = sensors::read_traffic(&self.runner, &interface).await {
            snapshot.insert(
                SENSOR_DOWNLOAD_BYTES.to_string(),
                SensorValue::Int(sample.rx_bytes),
            );
            snapshot.insert(
                SENSOR_UPLOAD_BYTES.to_string(),
                SensorValue::Int(sample.tx_bytes),
            );

            let mut previous = self.traffic.lock().await;
            if let Some((rx_rate, tx_rate)) = previous
                .as_ref()
                .and_then(|prev| sample.rates_since(prev))
            {
                snapshot.insert(SENSOR_DOWNLOAD_RATE.to_string(), SensorValue::Float(rx_rate));
                snapshot.insert(SENSOR_UPLOAD_RATE.to_string(), SensorValue::Float(tx_rate));
            }
            *previous = Some(sample);
        }

        sensors::collect_load_avg(&self.runner, &mut snapshot).await;
        sensors::collect_temperatures(&self.runner, &mut snapshot).await;

        tracing::trace!("Router '{}': {} sensor readings", self.name, snapshot.len());
        snapshot
    }

    /// Reads a group of configuration-store fields, keeping what succeeds
    pub async fn get_nvram_info(&self, kind: NvramKind) -> HashMap<String, String> {
        self.get_nvram_report(kind).await.values
    }

    /// Like [`Self::get_nvram_info`], but also reports the sub-queries that failed
    pub async fn get_nvram_report(&self, kind: NvramKind) -> NvramReport {
        sensors::read_nvram(&self.runner, kind).await
    }

    /// Stores new options and reports whether the caller must reload the session
    ///
    /// New options take effect on the next refresh; cached data is left as is.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `new_options` are invalid. The current
    /// options stay in place.
    pub async fn update_options(&self, new_options: RouterOptions) -> Result<bool> {
        if let Err(e) = new_options.validate() {
            tracing::error!("Router '{}': rejected options update: {}", self.name, e);
            return Err(e);
        }
        let mut options = self.options.write().await;
        let reload = options.requires_reload(&new_options);
        if reload {
            tracing::info!("Router '{}': options changed, reload required", self.name);
        }
        *options = new_options;
        Ok(reload)
    }

    pub async fn status(&self) -> SessionStatus {
        self.health.lock().await.status()
    }

    pub async fn session_report(&self) -> SessionReport {
        let health = self.health.lock().await;
        SessionReport {
            status: health.status(),
            consecutive_failures: health.consecutive_failures(),
            seconds_since_success: health.since_last_success().map(|d| d.as_secs()),
        }
    }
}
