// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! SSH transport backed by `russh`
//!
//! One authenticated session is kept per router and each command gets its own
//! exec channel. The session is opened on first use and reopened after a
//! transport failure. Host keys must already be in `~/.ssh/known_hosts`.

use russh::ChannelMsg;
use russh::client::{self, Handle};
use russh::keys::ssh_key::PublicKey;
use russh::keys::{PrivateKeyWithHashAlg, check_known_hosts, load_secret_key};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::CommandRunner;
use crate::error::CommandError;

const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(120);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Keys tried under `$HOME` when no identity file is configured
const DEFAULT_IDENTITIES: [&str; 2] = [".ssh/id_ed25519", ".ssh/id_rsa"];

/// Accepts only server keys listed in `known_hosts`
struct KnownHostsCheck {
    host: String,
    port: u16,
}

impl client::Handler for KnownHostsCheck {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        match check_known_hosts(&self.host, self.port, server_public_key) {
            Ok(true) => Ok(true),
            Ok(false) => {
                tracing::warn!(
                    "Host key for {}:{} is not in known_hosts, refusing connection",
                    self.host,
                    self.port
                );
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Host key check for {}:{} failed: {}", self.host, self.port, e);
                Ok(false)
            }
        }
    }
}

pub struct SshConnection {
    host: String,
    port: u16,
    username: String,
    identity_file: Option<String>,
    session: Mutex<Option<Handle<KnownHostsCheck>>>,
}

impl SshConnection {
    /// Describes the target; nothing is connected until the first command
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        identity_file: Option<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            identity_file,
            session: Mutex::new(None),
        }
    }

    fn identity_path(&self) -> Result<PathBuf, CommandError> {
        if let Some(path) = &self.identity_file {
            return Ok(PathBuf::from(path));
        }
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| CommandError::Auth("no identity file and HOME is unset".to_string()))?;
        DEFAULT_IDENTITIES
            .iter()
            .map(|name| home.join(name))
            .find(|path| path.exists())
            .ok_or_else(|| CommandError::Auth("no identity file found in ~/.ssh".to_string()))
    }

    async fn connect(&self) -> Result<Handle<KnownHostsCheck>, CommandError> {
        let config = Arc::new(client::Config {
            inactivity_timeout: Some(INACTIVITY_TIMEOUT),
            keepalive_interval: Some(KEEPALIVE_INTERVAL),
            ..Default::default()
        });
        let handler = KnownHostsCheck {
            host: self.host.clone(),
            port: self.port,
        };

        tracing::debug!("Connecting to {}@{}:{}", self.username, self.host, self.port);
        let mut session = client::connect(config, (self.host.as_str(), self.port), handler)
            .await
            .map_err(transport)?;

        let key_path = self.identity_path()?;
        let key = load_secret_key(&key_path, None).map_err(|e| {
            CommandError::Auth(format!("cannot load key {}: {e}", key_path.display()))
        })?;
        let hash_alg = session
            .best_supported_rsa_hash()
            .await
            .map_err(transport)?
            .flatten();
        let auth = session
            .authenticate_publickey(
                &self.username,
                PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
            )
            .await
            .map_err(transport)?;
        if !auth.success() {
            return Err(CommandError::Auth(format!(
                "public key rejected for {}@{}",
                self.username, self.host
            )));
        }

        tracing::info!("SSH session established to {}:{}", self.host, self.port);
        Ok(session)
    }
}

impl CommandRunner for SshConnection {
    async fn run_command(&self, command: &str) -> Result<String, CommandError> {
        let mut session = self.session.lock().await;
        let handle = match session.take() {
            Some(handle) if !handle.is_closed() => handle,
            _ => self.connect().await?,
        };

        let result = exec(&handle, command).await;
        if let Err(CommandError::Transport(e)) = &result {
            tracing::debug!("Dropping SSH session to {}: {}", self.host, e);
        } else {
            *session = Some(handle);
        }
        result
    }
}

fn transport(e: russh::Error) -> CommandError {
    CommandError::Transport(e.to_string())
}

/// Run `command` on a fresh exec channel and collect its output
async fn exec(handle: &Handle<KnownHostsCheck>, command: &str) -> Result<String, CommandError> {
    let mut channel = handle.channel_open_session().await.map_err(transport)?;
    channel.exec(true, command).await.map_err(transport)?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit_status = None;
    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
            ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
            _ => {}
        }
    }
    command_output(&stdout, &stderr, exit_status)
}

/// Map collected channel output to the command result
fn command_output(
    stdout: &[u8],
    stderr: &[u8],
    exit_status: Option<u32>,
) -> Result<String, CommandError> {
    match exit_status {
        Some(0) => Ok(String::from_utf8_lossy(stdout).into_owned()),
        status => Err(CommandError::Exit {
            code: status.and_then(|s| i32::try_from(s).ok()),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }),
    }
}
