// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! HTTP API module for OpenWrt Exporter
//!
//! Provides REST API endpoints for health checks, Prometheus metrics and device lists.
//!
//! # Endpoints
//! - `GET /health` — health check with per-router availability
//! - `GET /metrics` — Prometheus metrics
//! - `GET /devices` — devices per router as JSON

pub mod handlers;
mod state;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::config::Config;
use crate::metrics::MetricsRegistry;

pub use state::{RouterStates, RouterView};

/// Application state shared with endpoints
pub struct AppState {
    pub config: Config,
    pub metrics: MetricsRegistry,
    pub routers: RouterStates,
}

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/devices", get(handlers::devices_handler))
        .with_state(state)
}
