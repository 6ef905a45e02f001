//! External tool invocation
//!
//! Every adb and waydroid call goes through here. Calls have no timeout:
//! a hung tool hangs the caller.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ToolError;

fn render(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn spawn_error(program: &str, err: std::io::Error) -> ToolError {
    ToolError::Spawn {
        program: program.to_string(),
        reason: err.to_string(),
    }
}

/// Run a tool to completion, discarding its output
pub async fn run(program: &str, args: &[&str]) -> Result<(), ToolError> {
    let command = render(program, args);
    debug!("exec: {}", command);

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| spawn_error(program, e))?;

    if status.success() {
        Ok(())
    } else {
        warn!("`{}` failed with {}", command, status);
        Err(ToolError::NonZeroExit {
            command,
            code: status.code(),
        })
    }
}

/// Run a tool to completion and return its standard output
pub async fn capture(program: &str, args: &[&str]) -> Result<String, ToolError> {
    let command = render(program, args);
    debug!("exec (capture): {}", command);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| spawn_error(program, e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(ToolError::NonZeroExit {
            command,
            code: output.status.code(),
        })
    }
}

/// Start a long-running tool in the background and return immediately
///
/// The child is not awaited; the runtime reaps it when it exits.
pub fn spawn_detached(program: &str, args: &[&str]) -> Result<(), ToolError> {
    debug!("exec (detached): {}", render(program, args));

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
        .map_err(|e| spawn_error(program, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(
            render("adb", &["shell", "input", "keyevent", "KEYCODE_BACK"]),
            "adb shell input keyevent KEYCODE_BACK"
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = run("/nonexistent/waytv-tool", &[]).await.unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_exit_status_is_reported() {
        assert_eq!(run("true", &[]).await, Ok(()));
        let err = run("false", &[]).await.unwrap_err();
        assert!(matches!(err, ToolError::NonZeroExit { code: Some(1), .. }));
    }

    #[tokio::test]
    async fn test_capture_returns_stdout() {
        let out = capture("echo", &["Session:", "RUNNING"]).await.unwrap();
        assert_eq!(out.trim(), "Session: RUNNING");
    }
}
