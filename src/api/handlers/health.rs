// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::AppState;
use crate::openwrt::SessionStatus;

/// Health check endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Router name -> `available` / `unavailable`
    pub routers: BTreeMap<String, String>,
}

/// GET /health
///
/// Reports "ok" when every polled router is available, "degraded" otherwise.
/// Routers not yet polled are listed as "pending".
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let views = state.routers.all().await;
    let mut routers = BTreeMap::new();
    let mut degraded = false;
    for router in &state.config.routers {
        let status = match views.get(&router.name).map(|v| v.status) {
            Some(SessionStatus::Available) => "available",
            Some(SessionStatus::Unavailable) => {
                degraded = true;
                "unavailable"
            }
            None => "pending",
        };
        routers.insert(router.name.clone(), status.to_string());
    }

    let response = HealthResponse {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        routers,
    };

    (StatusCode::OK, Json(response))
}
