//! Aynary Bridge Error Types
//!
//! Channel errors carry the same wording a browser reports for a failed
//! native messaging port, so logs read the same on both sides.

use std::time::Duration;
use thiserror::Error;

/// Central error type for the dispatch bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Specified native messaging host not found.")]
    HostNotFound(String),

    #[error("Access to the specified native messaging host is forbidden.")]
    Forbidden(String),

    #[error("Native host has exited.")]
    HostExited(Option<i32>),

    #[error("Error when communicating with the native messaging host.")]
    Communication(String),

    #[error("No response from native host within {0:?}")]
    Timeout(Duration),

    #[error("Invalid native host name: {0}")]
    InvalidHostName(String),

    #[error("Message of {0} bytes exceeds the {1} byte limit")]
    MessageTooLarge(usize, usize),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Extra detail not carried by the display string (path, exit code, cause)
    pub fn detail(&self) -> Option<String> {
        match self {
            BridgeError::HostNotFound(d)
            | BridgeError::Forbidden(d)
            | BridgeError::Communication(d) => Some(d.clone()),
            BridgeError::HostExited(Some(code)) => Some(format!("exit code {}", code)),
            _ => None,
        }
    }
}
