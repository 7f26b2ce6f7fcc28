// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for OpenWrt Exporter application
//!
//! Loads and parses configuration from environment variables and JSON.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::openwrt::RouterMode;

#[cfg(test)]
mod tests;

/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "0.0.0.0:9100";
    pub const SSH_PORT: u16 = 22;
    pub const SSH_USERNAME: &str = "root";
    pub const COLLECTION_INTERVAL_SECS: u64 = 30;
    pub const CACHE_TTL_SECS: u64 = 5;
    pub const REQUIRE_IP: bool = true;
    pub const LEASES_PATH: &str = "/tmp";
    pub const INTERFACE: &str = "eth0";
    pub const COMMAND_TIMEOUT_SECS: u64 = 10;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const ROUTERS_CONFIG: &str = "ROUTERS_CONFIG";
    pub const COLLECTION_INTERVAL: &str = "COLLECTION_INTERVAL_SECONDS";
    pub const HOST: &str = "OPENWRT_HOST";
    pub const PORT: &str = "OPENWRT_PORT";
    pub const USERNAME: &str = "OPENWRT_USERNAME";
    pub const SSH_KEY: &str = "OPENWRT_SSH_KEY";
    pub const MODE: &str = "OPENWRT_MODE";
    pub const REQUIRE_IP: &str = "OPENWRT_REQUIRE_IP";
    pub const CACHE_TTL: &str = "OPENWRT_CACHE_TTL";
    pub const LEASES_PATH: &str = "OPENWRT_LEASES_PATH";
    pub const INTERFACE: &str = "OPENWRT_INTERFACE";
}

/// Polling options for one router session
///
/// Changing any of these requires the session to be rebuilt, see
/// [`RouterOptions::requires_reload`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Device cache lifetime
    pub ttl_seconds: u64,
    /// Drop devices without a known IP address
    pub require_ip: bool,
    pub mode: RouterMode,
    /// Directory holding the DHCP lease files
    pub leases_path: String,
    /// WAN interface for traffic counters
    pub interface: String,
    pub command_timeout_secs: u64,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: defaults::CACHE_TTL_SECS,
            require_ip: defaults::REQUIRE_IP,
            mode: RouterMode::default(),
            leases_path: defaults::LEASES_PATH.to_string(),
            interface: defaults::INTERFACE.to_string(),
            command_timeout_secs: defaults::COMMAND_TIMEOUT_SECS,
        }
    }
}

impl RouterOptions {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// True if moving from `self` to `new` needs the session rebuilt
    #[must_use]
    pub fn requires_reload(&self, new: &RouterOptions) -> bool {
        self != new
    }

    /// Validates option values
    ///
    /// `interface` and `leases_path` end up inside remote shell commands, so both
    /// are limited to characters the shell treats literally.
    pub fn validate(&self) -> Result<()> {
        if self.leases_path.is_empty() {
            return Err(AppError::Config("Leases path cannot be empty".to_string()));
        }
        if !leases_path_pattern().is_match(&self.leases_path)
            || self.leases_path.split('/').any(|part| part == "..")
        {
            return Err(AppError::Config(format!(
                "Invalid leases path '{}': expected a plain absolute path",
                self.leases_path
            )));
        }
        if !interface_pattern().is_match(&self.interface)
            || matches!(self.interface.as_str(), "." | "..")
        {
            return Err(AppError::Config(format!(
                "Invalid interface name '{}'",
                self.interface
            )));
        }
        if self.command_timeout_secs == 0 {
            return Err(AppError::Config(
                "Command timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

fn interface_pattern() -> &'static Regex {
    static INTERFACE: OnceLock<Regex> = OnceLock::new();
    INTERFACE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._@-]+$").expect("interface pattern is valid"))
}

fn leases_path_pattern() -> &'static Regex {
    static LEASES_PATH: OnceLock<Regex> = OnceLock::new();
    LEASES_PATH
        .get_or_init(|| Regex::new(r"^/[A-Za-z0-9._/-]*$").expect("leases path pattern is valid"))
}

fn default_port() -> u16 {
    defaults::SSH_PORT
}

fn default_username() -> String {
    defaults::SSH_USERNAME.to_string()
}

/// Configuration for a single OpenWrt router
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub ssh_key: Option<String>,
    #[serde(flatten)]
    pub options: RouterOptions,
}

impl RouterConfig {
    /// Validates router configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Config("Router name cannot be empty".to_string()));
        }

        if self.host.trim().is_empty() || self.host.contains(char::is_whitespace) {
            return Err(AppError::Config(format!(
                "Invalid host '{}' for router '{}'",
                self.host, self.name
            )));
        }

        if self.username.trim().is_empty() {
            return Err(AppError::Config(format!(
                "Username cannot be empty for router '{}'",
                self.name
            )));
        }

        self.options.validate()
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub routers: Vec<RouterConfig>,
    pub collection_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: defaults::SERVER_ADDR.to_string(),
            routers: vec![],
            collection_interval_secs: defaults::COLLECTION_INTERVAL_SECS,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// Invalid router entries are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `ROUTERS_CONFIG` is not valid JSON or a mode value is unsupported.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server_addr = std::env::var(env_vars::SERVER_ADDR)
            .unwrap_or_else(|_| defaults::SERVER_ADDR.to_string());

        let routers = if let Ok(config_json) = std::env::var(env_vars::ROUTERS_CONFIG) {
            Self::parse_routers(&config_json)?
        } else if let Ok(host) = std::env::var(env_vars::HOST) {
            vec![Self::router_from_legacy_env(host)?]
        } else {
            tracing::warn!(
                "No router configuration found. Service will start but /metrics will be empty."
            );
            vec![]
        };

        let routers = routers
            .into_iter()
            .filter(|router| match router.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Invalid router configuration: {}", e);
                    tracing::warn!("Skipping invalid router: {}", router.name);
                    false
                }
            })
            .collect();

        let collection_interval_secs = env_or(
            env_vars::COLLECTION_INTERVAL,
            defaults::COLLECTION_INTERVAL_SECS,
        )
        .max(1);

        Ok(Config {
            server_addr,
            routers,
            collection_interval_secs,
        })
    }

    /// Parses a JSON array of router configurations
    pub fn parse_routers(json: &str) -> Result<Vec<RouterConfig>> {
        serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Failed to parse ROUTERS_CONFIG: {e}")))
    }

    fn router_from_legacy_env(host: String) -> Result<RouterConfig> {
        let mode = match std::env::var(env_vars::MODE) {
            Ok(value) => value.parse()?,
            Err(_) => RouterMode::default(),
        };

        Ok(RouterConfig {
            name: "default".to_string(),
            host,
            port: env_or(env_vars::PORT, defaults::SSH_PORT),
            username: std::env::var(env_vars::USERNAME)
                .unwrap_or_else(|_| defaults::SSH_USERNAME.to_string()),
            ssh_key: std::env::var(env_vars::SSH_KEY).ok(),
            options: RouterOptions {
                ttl_seconds: env_or(env_vars::CACHE_TTL, defaults::CACHE_TTL_SECS),
                require_ip: env_or(env_vars::REQUIRE_IP, defaults::REQUIRE_IP),
                mode,
                leases_path: std::env::var(env_vars::LEASES_PATH)
                    .unwrap_or_else(|_| defaults::LEASES_PATH.to_string()),
                interface: std::env::var(env_vars::INTERFACE)
                    .unwrap_or_else(|_| defaults::INTERFACE.to_string()),
                command_timeout_secs: defaults::COMMAND_TIMEOUT_SECS,
            },
        })
    }
}
