// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod devices;
mod health;
mod metrics;

pub use devices::devices_handler;
pub use health::health_check;
pub use metrics::metrics_handler;
