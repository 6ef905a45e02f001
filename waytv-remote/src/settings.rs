//! Application settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use waytv_control::{DriverConfig, SessionConfig};
use waytv_core::DigitMap;
use waytv_input::{DEFAULT_INPUT_DIR, DEFAULT_POLL_TIMEOUT};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Keypad digit to channel table
    pub digits: DigitMap,
    /// Waydroid and adb tools
    pub session: SessionConfig,
    /// Settle delay scale and key failure policy
    pub driver: DriverConfig,
    /// adb serial to pin key events to (e.g. `192.168.240.112:5555`)
    pub adb_serial: Option<String>,
    /// Directory scanned for event nodes
    pub input_dir: PathBuf,
    /// Explicit device nodes; empty means scan `input_dir`
    pub devices: Vec<PathBuf>,
    /// Readiness timeout of both input loops (ms)
    pub poll_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            digits: DigitMap::default(),
            session: SessionConfig::default(),
            driver: DriverConfig::default(),
            adb_serial: None,
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            devices: Vec::new(),
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for waytv
    /// Uses $XDG_CONFIG_HOME/waytv, falls back to ~/.config/waytv
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("waytv"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("waytv"))
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from `path`, or from the default location
    ///
    /// A missing file gives the defaults. So does an unreadable or invalid
    /// one, with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::settings_path) else {
            warn!("Could not determine settings path; using defaults");
            return Self::default();
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}; using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read {}: {}; using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Invalid settings in {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms.max(1))
    }
}
