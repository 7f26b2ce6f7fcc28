// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Remote command execution over an already-authenticated shell channel

mod ssh;

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::error::CommandError;

pub use ssh::SshConnection;

/// Prepended to every command so minimal login shells still find `ip`, `uci`, etc.
const PATH_EXPORT_COMMAND: &str = "PATH=$PATH:/usr/sbin:/usr/bin:/sbin:/bin";

/// A transport able to run one shell command and return its stdout
pub trait CommandRunner: Send + Sync + 'static {
    fn run_command(
        &self,
        command: &str,
    ) -> impl Future<Output = Result<String, CommandError>> + Send;
}

/// Serializes commands over one connection and bounds each with a timeout
///
/// The remote side accepts only one in-flight command, so device and sensor
/// polls running concurrently queue up here.
pub(crate) struct Runner<C> {
    conn: C,
    lock: Mutex<()>,
    command_timeout: Duration,
}

impl<C: CommandRunner> Runner<C> {
    pub(crate) fn new(conn: C, command_timeout: Duration) -> Self {
        Self {
            conn,
            lock: Mutex::new(()),
            command_timeout,
        }
    }

    /// Run `command` and return its stdout
    pub(crate) async fn run(&self, command: &str) -> Result<String, CommandError> {
        let full = format!("{PATH_EXPORT_COMMAND} && {command}");
        let _guard = self.lock.lock().await;
        tracing::trace!("Running remote command: {}", command);
        let output = timeout(self.command_timeout, self.conn.run_command(&full))
            .await
            .map_err(|_| CommandError::Timeout(self.command_timeout))??;
        tracing::trace!("Command '{}' returned {} bytes", command, output.len());
        Ok(output)
    }

    /// Run `command`, logging and swallowing any failure
    ///
    /// A source that fails contributes nothing; the caller carries on.
    pub(crate) async fn run_or_empty(&self, source: &str, command: &str) -> Option<String> {
        match self.run(command).await {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::warn!("Source '{}' unavailable: {}", source, e);
                None
            }
        }
    }
}
