// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Session health tracking across poll cycles

use super::types::SessionStatus;

/// Consecutive total failures before the session reports itself unavailable
const UNAVAILABLE_AFTER: u32 = 3;

/// Tracks whether recent poll cycles reached the router at all
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionHealth {
    consecutive_failures: u32,
    last_success_time: Option<tokio::time::Instant>,
}

impl SessionHealth {
    pub(crate) fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.last_success_time = Some(tokio::time::Instant::now());
    }

    pub(crate) fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    pub(crate) fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Time since the last cycle that reached the router
    pub(crate) fn since_last_success(&self) -> Option<std::time::Duration> {
        self.last_success_time.map(|t| t.elapsed())
    }

    pub(crate) fn status(&self) -> SessionStatus {
        if self.consecutive_failures >= UNAVAILABLE_AFTER {
            SessionStatus::Unavailable
        } else {
            SessionStatus::Available
        }
    }
}
