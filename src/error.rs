// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Error types for OpenWrt Exporter application

use std::time::Duration;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Remote command error
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Metrics encoding error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),
}

/// Failure of a single remote command
///
/// Always recoverable: the affected source contributes nothing to the poll.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The router refused our credentials or no key could be loaded
    #[error("SSH authentication failed: {0}")]
    Auth(String),

    /// The command ran but exited unsuccessfully
    #[error("remote command exited with status {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    /// The command did not finish in time
    #[error("remote command timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or channel failure
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = AppError::Config("test error".to_string());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_command_error_conversion() {
        let err: AppError = CommandError::Timeout(Duration::from_secs(10)).into();
        assert!(matches!(err, AppError::Command(CommandError::Timeout(_))));
        assert_eq!(err.to_string(), "Command error: remote command timed out after 10s");
    }

    #[test]
    fn test_exit_error_message() {
        let err = CommandError::Exit {
            code: Some(1),
            stderr: "uci: Entry not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote command exited with status Some(1): uci: Entry not found"
        );
    }

    #[test]
    fn test_auth_error_message() {
        let err = CommandError::Auth("public key rejected for root@10.0.0.1".to_string());
        assert_eq!(
            err.to_string(),
            "SSH authentication failed: public key rejected for root@10.0.0.1"
        );
    }

    #[test]
    fn test_metrics_error() {
        let err = AppError::Metrics("encoding failed".to_string());
        assert_eq!(err.to_string(), "Metrics error: encoding failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_addr_parse_error_conversion() {
        let parse_result = "invalid".parse::<std::net::IpAddr>();
        assert!(parse_result.is_err());
        let app_err: AppError = parse_result.unwrap_err().into();
        assert!(matches!(app_err, AppError::AddrParse(_)));
    }
}
