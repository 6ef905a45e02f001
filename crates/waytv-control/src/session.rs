//! Android container session
//!
//! [`SessionManager`] is the seam the dispatcher uses to start and stop the
//! container. [`WaydroidSession`] implements it by driving the `waydroid`
//! command line and connecting adb to the container's IP address.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ToolError;
use crate::process;

/// Status value used when a field is missing or the status query failed
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Container session lifecycle
pub trait SessionManager {
    /// Whether the container session is up
    fn is_running(&self) -> bool;

    /// Whether the debug bridge is connected to the container
    fn is_bridge_connected(&self) -> bool;

    /// Start the session and connect the bridge
    fn launch_session(&mut self) -> impl Future<Output = Result<(), ToolError>> + Send;

    /// Disconnect the bridge and stop the session
    fn stop_session(&mut self) -> impl Future<Output = Result<(), ToolError>> + Send;
}

/// Parsed `waydroid status` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// `Session:` field
    pub session: String,
    /// `Container:` field
    pub container: String,
    /// `IP address:` field
    pub ip_address: String,
}

impl SessionStatus {
    /// Status with every field unknown
    pub fn unknown() -> Self {
        Self {
            session: UNKNOWN_STATUS.to_string(),
            container: UNKNOWN_STATUS.to_string(),
            ip_address: UNKNOWN_STATUS.to_string(),
        }
    }

    /// Parse `key: value` lines, ignoring keys we do not track
    pub fn parse(output: &str) -> Self {
        let mut status = Self::unknown();
        for line in output.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "Session" => status.session = value,
                "Container" => status.container = value,
                "IP address" => status.ip_address = value,
                _ => {}
            }
        }
        status
    }

    /// Both the session and its container report `RUNNING`
    pub fn is_running(&self) -> bool {
        self.session == "RUNNING" && self.container == "RUNNING"
    }

    /// Container IP address, if one was reported
    pub fn ip(&self) -> Option<&str> {
        let ip = self.ip_address.as_str();
        (!ip.is_empty() && ip != UNKNOWN_STATUS).then_some(ip)
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Tools and waits used by [`WaydroidSession`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `waydroid` binary
    pub waydroid_path: String,
    /// `adb` binary
    pub adb_path: String,
    /// adb TCP port inside the container
    pub adb_port: u16,
    /// Wait after `waydroid session start` (ms)
    pub session_start_wait_ms: u64,
    /// Wait after `waydroid show-full-ui` (ms)
    pub show_ui_wait_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            waydroid_path: "waydroid".to_string(),
            adb_path: "adb".to_string(),
            adb_port: 5555,
            session_start_wait_ms: 10_000,
            show_ui_wait_ms: 10_000,
        }
    }
}

/// Waydroid-backed session manager
#[derive(Debug)]
pub struct WaydroidSession {
    config: SessionConfig,
    status: SessionStatus,
    adb_connected: bool,
}

impl WaydroidSession {
    /// Create a session manager and detect the current status
    pub async fn detect(config: SessionConfig) -> Self {
        let mut session = Self {
            config,
            status: SessionStatus::unknown(),
            adb_connected: false,
        };
        session.refresh().await;
        session
    }

    /// Last parsed status
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// adb serial of the container, once its IP is known
    pub fn adb_target(&self) -> Option<String> {
        self.status
            .ip()
            .map(|ip| format!("{}:{}", ip, self.config.adb_port))
    }

    /// Re-read `waydroid status`
    ///
    /// A failed detection leaves every field unknown rather than failing.
    pub async fn refresh(&mut self) {
        self.status = match process::capture(&self.config.waydroid_path, &["status"]).await {
            Ok(output) => SessionStatus::parse(&output),
            Err(e) => {
                warn!("Error reading waydroid status: {}", e);
                SessionStatus::unknown()
            }
        };
        info!(
            "Parsed status - session: {}, container: {}, ip: {}",
            self.status.session, self.status.container, self.status.ip_address
        );
    }

    async fn connect_adb(&mut self) -> Result<(), ToolError> {
        let target = self.adb_target().ok_or_else(|| {
            ToolError::Unavailable("no container IP address for adb connection".to_string())
        })?;
        process::run(&self.config.adb_path, &["connect", &target]).await?;
        self.adb_connected = true;
        info!("adb connected to {}", target);
        Ok(())
    }

    async fn disconnect_adb(&mut self) -> Result<(), ToolError> {
        let target = self.adb_target().ok_or_else(|| {
            ToolError::Unavailable("no container IP address for adb disconnect".to_string())
        })?;
        process::run(&self.config.adb_path, &["disconnect", &target]).await?;
        self.adb_connected = false;
        info!("adb disconnected from {}", target);
        Ok(())
    }
}

impl SessionManager for WaydroidSession {
    fn is_running(&self) -> bool {
        self.status.is_running()
    }

    fn is_bridge_connected(&self) -> bool {
        self.adb_connected
    }

    async fn launch_session(&mut self) -> Result<(), ToolError> {
        if self.is_running() && self.adb_connected {
            return Ok(());
        }

        if !self.is_running() {
            let waydroid = self.config.waydroid_path.clone();
            process::spawn_detached(&waydroid, &["session", "start"])?;
            info!("Waydroid session start issued");
            tokio::time::sleep(Duration::from_millis(self.config.session_start_wait_ms)).await;

            process::spawn_detached(&waydroid, &["show-full-ui"])?;
            info!("Waydroid UI requested");
            tokio::time::sleep(Duration::from_millis(self.config.show_ui_wait_ms)).await;

            self.refresh().await;
        }

        if !self.adb_connected {
            self.connect_adb().await?;
        }
        Ok(())
    }

    async fn stop_session(&mut self) -> Result<(), ToolError> {
        if !self.is_running() && !self.adb_connected {
            return Ok(());
        }

        if self.adb_connected {
            if let Err(e) = self.disconnect_adb().await {
                warn!("adb disconnect failed: {}", e);
            }
        }

        if self.is_running() {
            let waydroid = self.config.waydroid_path.clone();
            let result = process::run(&waydroid, &["session", "stop"]).await;
            self.refresh().await;
            result?;
            info!("Waydroid session stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUNNING: &str = "Session:\tRUNNING\n\
                           Container:\tRUNNING\n\
                           Vendor type:\tMAINLINE\n\
                           IP address:\t192.168.240.112\n\
                           Session user:\tuser(1000)\n";

    #[test]
    fn test_parse_running_status() {
        let status = SessionStatus::parse(RUNNING);
        assert_eq!(status.session, "RUNNING");
        assert_eq!(status.container, "RUNNING");
        assert_eq!(status.ip(), Some("192.168.240.112"));
        assert!(status.is_running());
    }

    #[test]
    fn test_parse_stopped_status() {
        let status = SessionStatus::parse("Session:\tSTOPPED\nVendor type:\tMAINLINE\n");
        assert_eq!(status.session, "STOPPED");
        assert_eq!(status.container, UNKNOWN_STATUS);
        assert_eq!(status.ip(), None);
        assert!(!status.is_running());
    }

    #[test]
    fn test_frozen_container_is_not_running() {
        let status = SessionStatus::parse("Session: RUNNING\nContainer: FROZEN\n");
        assert!(!status.is_running());
    }

    #[test]
    fn test_parse_ignores_lines_without_separator() {
        let status = SessionStatus::parse("[waydroid] some banner\n\nSession: RUNNING\n");
        assert_eq!(status.session, "RUNNING");
    }

    #[tokio::test]
    async fn test_detect_with_missing_tool_is_unknown() {
        let config = SessionConfig {
            waydroid_path: "/nonexistent/waydroid".to_string(),
            ..Default::default()
        };
        let session = WaydroidSession::detect(config).await;
        assert_eq!(session.status(), &SessionStatus::unknown());
        assert!(!session.is_running());
        assert!(!session.is_bridge_connected());
        assert_eq!(session.adb_target(), None);
    }
}
