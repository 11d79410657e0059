//! Native Host Manifest Resolution
//!
//! Browsers locate a native host through a `<name>.json` manifest in a
//! well-known per-user directory. The bridge resolves hosts the same way.

use crate::error::{BridgeError, BridgeResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

lazy_static! {
    static ref HOST_NAME_RE: Regex =
        Regex::new(r"^[a-z0-9_]+(\.[a-z0-9_]+)*$").expect("host name pattern is valid");
}

/// Host names are dot-separated lowercase segments
pub fn validate_host_name(name: &str) -> BridgeResult<()> {
    if HOST_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(BridgeError::InvalidHostName(name.to_string()))
    }
}

/// Native messaging host manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_origins: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_extensions: Vec<String>,
}

/// Per-user manifest directories for Chrome, Chromium and Firefox
pub fn default_manifest_dirs() -> Vec<PathBuf> {
    let mut found = Vec::new();

    if let Some(config) = dirs::config_dir() {
        found.push(config.join("google-chrome/NativeMessagingHosts"));
        found.push(config.join("chromium/NativeMessagingHosts"));
    }
    if let Some(home) = dirs::home_dir() {
        found.push(home.join(".mozilla/native-messaging-hosts"));
    }
    found
}

/// Find and parse the manifest for `host_name`, checking `search_dirs` in order
pub fn resolve(host_name: &str, search_dirs: &[PathBuf]) -> BridgeResult<HostManifest> {
    validate_host_name(host_name)?;

    let file_name = format!("{}.json", host_name);
    let manifest_path = search_dirs
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            BridgeError::HostNotFound(format!("no manifest for {} in search path", host_name))
        })?;

    debug!("Native host manifest: {:?}", manifest_path);
    load(&manifest_path, host_name)
}

fn load(manifest_path: &Path, host_name: &str) -> BridgeResult<HostManifest> {
    let content = std::fs::read_to_string(manifest_path)?;
    let manifest: HostManifest = serde_json::from_str(&content).map_err(|e| {
        BridgeError::HostNotFound(format!("invalid manifest {:?}: {}", manifest_path, e))
    })?;

    if manifest.name != host_name {
        return Err(BridgeError::Forbidden(format!(
            "manifest {:?} declares name '{}'",
            manifest_path, manifest.name
        )));
    }
    if manifest.kind != "stdio" {
        return Err(BridgeError::Forbidden(format!(
            "unsupported host type '{}'",
            manifest.kind
        )));
    }
    if !manifest.path.is_absolute() {
        return Err(BridgeError::HostNotFound(format!(
            "host path {:?} is not absolute",
            manifest.path
        )));
    }
    if !manifest.path.is_file() {
        return Err(BridgeError::HostNotFound(format!(
            "host executable {:?} missing",
            manifest.path
        )));
    }

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, file: &str, body: serde_json::Value) {
        std::fs::write(dir.path().join(file), body.to_string()).unwrap();
    }

    fn executable(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("host-bin");
        std::fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_validate_host_name() {
        assert!(validate_host_name("com.aynary.dictionary").is_ok());
        assert!(validate_host_name("host_1").is_ok());
        for bad in ["", "Com.Aynary", ".lead", "trail.", "dou..ble", "sp ace"] {
            assert!(validate_host_name(bad).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let bin = executable(&first);

        write_manifest(
            &second,
            "com.aynary.dictionary.json",
            serde_json::json!({"name": "com.aynary.dictionary", "path": "/nowhere", "type": "stdio"}),
        );
        write_manifest(
            &first,
            "com.aynary.dictionary.json",
            serde_json::json!({
                "name": "com.aynary.dictionary",
                "description": "Aynary dictionary",
                "path": bin,
                "type": "stdio",
                "allowed_origins": ["chrome-extension://abc/"]
            }),
        );

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let manifest = resolve("com.aynary.dictionary", &dirs).unwrap();
        assert_eq!(manifest.path, bin);
        assert_eq!(manifest.allowed_origins.len(), 1);
    }

    #[test]
    fn test_resolve_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve("com.aynary.dictionary", &[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, BridgeError::HostNotFound(_)));
    }

    #[test]
    fn test_resolve_name_mismatch_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let bin = executable(&dir);
        write_manifest(
            &dir,
            "com.aynary.dictionary.json",
            serde_json::json!({"name": "com.other.host", "path": bin, "type": "stdio"}),
        );

        let err = resolve("com.aynary.dictionary", &[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, BridgeError::Forbidden(_)));
    }

    #[test]
    fn test_resolve_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(
            &dir,
            "com.aynary.dictionary.json",
            serde_json::json!({
                "name": "com.aynary.dictionary",
                "path": dir.path().join("gone"),
                "type": "stdio"
            }),
        );

        let err = resolve("com.aynary.dictionary", &[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, BridgeError::HostNotFound(_)));
    }
}
