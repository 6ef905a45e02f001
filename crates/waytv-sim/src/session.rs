//! Scripted session manager

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;
use waytv_control::{SessionManager, ToolError};

#[derive(Debug, Default)]
struct SessionState {
    running: bool,
    connected: bool,
    fail_launch: bool,
    launches: usize,
    stops: usize,
}

/// Session manager whose state lives in memory
///
/// `launch_session` marks the session running and the bridge connected,
/// `stop_session` clears both. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSession {
    inner: Arc<Mutex<SessionState>>,
}

impl ScriptedSession {
    /// A session that is not running yet
    pub fn stopped() -> Self {
        Self::default()
    }

    /// A session that is already running with the bridge connected
    pub fn running() -> Self {
        let session = Self::default();
        session.set_state(true, true);
        session
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Force the session and bridge predicates
    pub fn set_state(&self, running: bool, connected: bool) {
        let mut state = self.state();
        state.running = running;
        state.connected = connected;
    }

    /// Make `launch_session` fail without changing state
    pub fn set_fail_launch(&self, fail: bool) {
        self.state().fail_launch = fail;
    }

    /// Number of successful `launch_session` calls
    pub fn launch_count(&self) -> usize {
        self.state().launches
    }

    /// Number of `stop_session` calls
    pub fn stop_count(&self) -> usize {
        self.state().stops
    }
}

impl SessionManager for ScriptedSession {
    fn is_running(&self) -> bool {
        self.state().running
    }

    fn is_bridge_connected(&self) -> bool {
        self.state().connected
    }

    async fn launch_session(&mut self) -> Result<(), ToolError> {
        let mut state = self.state();
        if state.fail_launch {
            return Err(ToolError::Unavailable(
                "scripted session refused to start".to_string(),
            ));
        }
        state.running = true;
        state.connected = true;
        state.launches += 1;
        info!("[sim] session started");
        Ok(())
    }

    async fn stop_session(&mut self) -> Result<(), ToolError> {
        let mut state = self.state();
        state.running = false;
        state.connected = false;
        state.stops += 1;
        info!("[sim] session stopped");
        Ok(())
    }
}
