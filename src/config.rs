use crate::bridge::manifest::validate_host_name;
use crate::error::{BridgeError, BridgeResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that points at an alternate config file
pub const CONFIG_ENV: &str = "AYNARY_BRIDGE_CONFIG";

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Native host
    pub host_name: String,
    pub host_args: Vec<String>,
    pub manifest_dirs: Vec<PathBuf>,
    pub response_timeout_ms: u64,

    // Fallback
    pub fallback_scheme: String,
    pub open_command: String,

    // Pull path
    pub selection_command: Vec<String>,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_name: "com.aynary.dictionary".to_string(),
            host_args: Vec::new(),
            manifest_dirs: Vec::new(),
            response_timeout_ms: 10_000,
            fallback_scheme: "aynary".to_string(),
            open_command: "xdg-open".to_string(),
            selection_command: vec![
                "xclip".to_string(),
                "-o".to_string(),
                "-selection".to_string(),
                "primary".to_string(),
            ],
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            return Self::load_from(&path);
        }

        let config = Self::default();
        if let Err(e) = config.save() {
            tracing::debug!("Could not write default config to {:?}: {}", path, e);
        }
        Ok(config)
    }

    /// Load config from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));

        match parsed {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file unreadable or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to a file
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Check values the bridge cannot run without
    pub fn validate(&self) -> BridgeResult<()> {
        validate_host_name(&self.host_name)?;

        if self.fallback_scheme.is_empty()
            || !self
                .fallback_scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(BridgeError::Config(format!(
                "invalid fallback scheme '{}'",
                self.fallback_scheme
            )));
        }
        if self.open_command.trim().is_empty() {
            return Err(BridgeError::Config("open_command is empty".to_string()));
        }
        if self.selection_command.is_empty() {
            return Err(BridgeError::Config(
                "selection_command is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `None` when the timeout is disabled
    pub fn response_timeout(&self) -> Option<Duration> {
        match self.response_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aynary")
        .join("bridge.json")
}
