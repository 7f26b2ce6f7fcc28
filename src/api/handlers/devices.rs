// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{Json, extract::State, response::IntoResponse};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{AppState, RouterView};

/// GET /devices
///
/// Returns the devices from the last collection cycle of every router.
/// Never triggers a remote poll.
pub async fn devices_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let views: BTreeMap<String, RouterView> = state.routers.all().await.into_iter().collect();
    Json(views)
}
