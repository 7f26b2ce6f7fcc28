// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Scrape and registry-level bookkeeping helpers

use crate::error::{AppError, Result};
use crate::metrics::labels::RouterLabels;
use prometheus_client::encoding::text::encode;

use super::MetricsRegistry;

impl MetricsRegistry {
    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry).map_err(|e| AppError::Metrics(e.to_string()))?;
        Ok(buffer)
    }

    pub fn record_scrape_success(&self, labels: &RouterLabels) {
        self.scrape_success.get_or_create(labels).inc();
    }

    pub fn record_scrape_error(&self, labels: &RouterLabels) {
        self.scrape_errors.get_or_create(labels).inc();
    }

    /// Initialize metrics for a router to zero
    ///
    /// Counters exist from the start so Prometheus can compute rates
    /// before the first success or error occurs.
    pub fn initialize_router_metrics(&self, labels: &RouterLabels) {
        let _ = self.scrape_success.get_or_create(labels);
        let _ = self.scrape_errors.get_or_create(labels);
        let _ = self.scrape_duration_milliseconds.get_or_create(labels);
    }

    pub fn record_scrape_duration(&self, labels: &RouterLabels, duration_secs: f64) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let millis = (duration_secs * 1000.0).round() as i64;
        self.scrape_duration_milliseconds
            .get_or_create(labels)
            .set(millis);
    }

    pub fn record_collection_cycle_duration(&self, duration_secs: f64) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let millis = (duration_secs * 1000.0).round() as i64;
        self.collection_cycle_duration_milliseconds.set(millis);
    }

    pub fn get_scrape_success_count(&self, labels: &RouterLabels) -> u64 {
        self.scrape_success.get_or_create(labels).get()
    }

    pub fn get_scrape_error_count(&self, labels: &RouterLabels) -> u64 {
        self.scrape_errors.get_or_create(labels).get()
    }
}
