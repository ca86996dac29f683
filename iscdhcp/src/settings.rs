use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the supervisor finds, writes and launches the DHCP daemon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonSettings {
    /// File the daemon reads its configuration from.
    pub config_path: PathBuf,
    /// Executable name as reported by `/proc/<pid>/comm`.
    pub process_name: String,
    /// Program and arguments that start the daemon.
    pub start_command: Vec<String>,
    pub stop_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Process table root; only changed by tests.
    #[serde(skip)]
    pub proc_root: PathBuf,
}

impl DaemonSettings {
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/etc/dhcp/dhcpd-dynamic.conf"),
            process_name: "dhcpd".to_string(),
            start_command: ["service", "isc-dhcp-server", "start"]
                .map(String::from)
                .to_vec(),
            stop_timeout_ms: 5000,
            poll_interval_ms: 100,
            proc_root: PathBuf::from("/proc"),
        }
    }
}

/// Errors returned when loading settings files.
#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("settings file {path}: start_command is empty")]
    EmptyStartCommand { path: String },
}

/// Load supervisor settings from a TOML file. Missing fields keep their
/// defaults.
pub fn load_settings(path: &Path) -> Result<DaemonSettings, SettingsLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_settings(&raw, path.display().to_string())
}

/// Built-in settings.
pub fn default_settings() -> DaemonSettings {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/settings/daemon.toml"));
    parse_settings(embedded, "embedded settings".to_string()).unwrap_or_default()
}

fn parse_settings(raw: &str, path: String) -> Result<DaemonSettings, SettingsLoadError> {
    let parsed: DaemonSettings = toml::from_str(raw).map_err(|source| SettingsLoadError::Parse {
        path: path.clone(),
        source,
    })?;
    if parsed.start_command.is_empty() {
        return Err(SettingsLoadError::EmptyStartCommand { path });
    }
    Ok(parsed)
}
