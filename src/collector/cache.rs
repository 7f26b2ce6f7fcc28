// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Cache for immutable router information

use crate::openwrt::RouterInfo;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache for model and firmware strings, read once per router
#[derive(Clone, Default)]
pub(super) struct RouterInfoCache {
    cache: Arc<RwLock<HashMap<String, RouterInfo>>>,
}

impl RouterInfoCache {
    #[must_use]
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) async fn get(&self, router_name: &str) -> Option<RouterInfo> {
        let cache = self.cache.read().await;
        cache.get(router_name).cloned()
    }

    pub(super) async fn set(&self, router_name: String, info: RouterInfo) {
        let mut cache = self.cache.write().await;
        tracing::debug!("Cached router info for router: {}", router_name);
        cache.insert(router_name, info);
    }
}
