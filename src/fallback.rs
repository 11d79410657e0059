//! Fallback delivery
//!
//! When the native host cannot be reached, the word is handed to the
//! dictionary app through its URI scheme instead.

use anyhow::Result;
use std::fmt;
use std::process::Command;
use tracing::debug;

/// `<scheme>://lookup/<percent-encoded word>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTarget(String);

impl FallbackTarget {
    pub fn new(scheme: &str, word: &str) -> Self {
        Self(format!("{}://lookup/{}", scheme, urlencoding::encode(word)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FallbackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generic "open this address" capability
pub trait TargetOpener: Send + Sync {
    fn open(&self, target: &FallbackTarget) -> Result<()>;
}

/// Opens targets with a desktop command such as `xdg-open`
#[derive(Debug, Clone)]
pub struct SystemOpener {
    command: String,
}

impl SystemOpener {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl TargetOpener for SystemOpener {
    fn open(&self, target: &FallbackTarget) -> Result<()> {
        debug!("Opening {} with {}", target, self.command);

        Command::new(&self.command)
            .arg(target.as_str())
            .spawn()
            .map_err(|e| anyhow::anyhow!("Failed to run '{}': {}", self.command, e))?;
        Ok(())
    }
}
