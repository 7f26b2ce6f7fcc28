// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Time-windowed cache entry for the reconciled device mapping

use std::time::Duration;
use tokio::time::Instant;

use super::types::DeviceMapping;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub mapping: DeviceMapping,
    pub timestamp: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    #[must_use]
    pub fn new(mapping: DeviceMapping, timestamp: Instant, ttl: Duration) -> Self {
        Self {
            mapping,
            timestamp,
            ttl,
        }
    }

    /// True once more than `ttl` has passed since `timestamp`
    #[must_use]
    pub fn is_stale(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) > self.ttl
    }
}
