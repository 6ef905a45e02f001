//! Collaborators that reach the Android container
//!
//! The control layer only talks to the container through these traits:
//! [`KeyTransport`] delivers synthesized key events and [`AppLauncher`]
//! starts and force-stops applications. [`AdbBridge`] implements both on top
//! of the `adb` command line tool.

use std::future::Future;

use tracing::debug;
use waytv_core::KeyCode;

use crate::error::ToolError;
use crate::process;

/// Fire-and-forget delivery of one key event
pub trait KeyTransport {
    /// Deliver a key event; `Ok` means the delivery tool reported success
    fn send_key(&self, key: KeyCode) -> impl Future<Output = Result<(), ToolError>> + Send;
}

/// Application lifecycle inside the container
pub trait AppLauncher {
    /// Start an activity component (`package/activity`)
    fn launch(&self, component: &str) -> impl Future<Output = Result<(), ToolError>> + Send;

    /// Force-stop every activity of a package
    fn force_stop(&self, package: &str) -> impl Future<Output = Result<(), ToolError>> + Send;
}

/// Everything a driver needs from the container
pub trait Bridge: KeyTransport + AppLauncher + Send + Sync {}

impl<T> Bridge for T where T: KeyTransport + AppLauncher + Send + Sync {}

/// adb-backed bridge
#[derive(Debug, Clone)]
pub struct AdbBridge {
    adb_path: String,
    serial: Option<String>,
}

impl AdbBridge {
    /// Create a bridge that uses the `adb` binary at `adb_path`
    ///
    /// With a `serial`, every call is pinned to that device (`adb -s`).
    pub fn new(adb_path: impl Into<String>, serial: Option<String>) -> Self {
        Self {
            adb_path: adb_path.into(),
            serial,
        }
    }

    fn shell_args<'a>(&'a self, shell: &[&'a str]) -> Vec<&'a str> {
        let mut args = Vec::with_capacity(shell.len() + 3);
        if let Some(serial) = &self.serial {
            args.push("-s");
            args.push(serial.as_str());
        }
        args.push("shell");
        args.extend_from_slice(shell);
        args
    }
}

impl Default for AdbBridge {
    fn default() -> Self {
        Self::new("adb", None)
    }
}

impl KeyTransport for AdbBridge {
    async fn send_key(&self, key: KeyCode) -> Result<(), ToolError> {
        debug!("adb key {}", key);
        let args = self.shell_args(&["input", "keyevent", key.as_str()]);
        process::run(&self.adb_path, &args).await
    }
}

impl AppLauncher for AdbBridge {
    async fn launch(&self, component: &str) -> Result<(), ToolError> {
        let args = self.shell_args(&["am", "start", "-n", component]);
        process::run(&self.adb_path, &args).await
    }

    async fn force_stop(&self, package: &str) -> Result<(), ToolError> {
        let args = self.shell_args(&["am", "force-stop", package]);
        process::run(&self.adb_path, &args).await
    }
}
