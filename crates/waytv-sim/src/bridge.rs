//! Recording bridge
//!
//! Implements the control layer's bridge traits without touching adb. Every
//! call is recorded in order, including the ones it was told to fail, so a
//! test sees exactly what a driver attempted.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;
use waytv_control::{AppLauncher, KeyTransport, ToolError};
use waytv_core::KeyCode;

/// One recorded bridge invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    /// `send_key`
    Key(KeyCode),
    /// `launch` with the activity component
    Launch(String),
    /// `force_stop` with the package
    ForceStop(String),
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<BridgeCall>,
    fail_keys: bool,
    fail_launch: bool,
    fail_force_stop: bool,
}

/// Bridge that records instead of delivering
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingBridge {
    /// Create a bridge where every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    fn recording(&self) -> MutexGuard<'_, Recording> {
        // A panicking test thread must not hide the calls made before it
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.recording().calls.clone()
    }

    /// Keys sent so far, in order
    pub fn keys(&self) -> Vec<KeyCode> {
        self.recording()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::Key(key) => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// Number of times `key` was sent
    pub fn count_key(&self, key: KeyCode) -> usize {
        self.keys().into_iter().filter(|k| *k == key).count()
    }

    /// Components launched so far
    pub fn launches(&self) -> Vec<String> {
        self.recording()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::Launch(component) => Some(component.clone()),
                _ => None,
            })
            .collect()
    }

    /// Packages force-stopped so far
    pub fn force_stops(&self) -> Vec<String> {
        self.recording()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::ForceStop(package) => Some(package.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget every recorded call; failure toggles are kept
    pub fn clear(&self) {
        self.recording().calls.clear();
    }

    /// Make `send_key` fail
    pub fn set_fail_keys(&self, fail: bool) {
        self.recording().fail_keys = fail;
    }

    /// Make `launch` fail
    pub fn set_fail_launch(&self, fail: bool) {
        self.recording().fail_launch = fail;
    }

    /// Make `force_stop` fail
    pub fn set_fail_force_stop(&self, fail: bool) {
        self.recording().fail_force_stop = fail;
    }

    fn record(&self, call: BridgeCall, command: &str) -> Result<(), ToolError> {
        let mut recording = self.recording();
        let fail = match call {
            BridgeCall::Key(_) => recording.fail_keys,
            BridgeCall::Launch(_) => recording.fail_launch,
            BridgeCall::ForceStop(_) => recording.fail_force_stop,
        };
        recording.calls.push(call);

        if fail {
            return Err(ToolError::NonZeroExit {
                command: command.to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

impl KeyTransport for RecordingBridge {
    async fn send_key(&self, key: KeyCode) -> Result<(), ToolError> {
        info!("[sim] key {}", key);
        self.record(
            BridgeCall::Key(key),
            &format!("input keyevent {}", key.as_str()),
        )
    }
}

impl AppLauncher for RecordingBridge {
    async fn launch(&self, component: &str) -> Result<(), ToolError> {
        info!("[sim] launch {}", component);
        self.record(
            BridgeCall::Launch(component.to_string()),
            &format!("am start -n {}", component),
        )
    }

    async fn force_stop(&self, package: &str) -> Result<(), ToolError> {
        info!("[sim] force-stop {}", package);
        self.record(
            BridgeCall::ForceStop(package.to_string()),
            &format!("am force-stop {}", package),
        )
    }
}
