//! Error types for the control layer

use std::fmt;

use thiserror::Error;
use waytv_core::{AppFamily, LogicalChannel};

/// Failure of an external tool invocation (adb, waydroid)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The program could not be started at all
    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// The program ran and reported failure
    #[error("`{command}` exited with status {}", status_label(.code))]
    NonZeroExit { command: String, code: Option<i32> },

    /// A precondition for the invocation is missing
    #[error("{0}")]
    Unavailable(String),
}

fn status_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Why a channel could not be resolved to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownReason {
    /// No application family serves the channel
    Unowned,
    /// The owning family has no position for the requested channel
    NoTargetPosition(AppFamily),
    /// The driver's current position cannot be resolved
    NoCurrentPosition(AppFamily),
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownReason::Unowned => f.write_str("not served by any application"),
            UnknownReason::NoTargetPosition(family) => {
                write!(f, "no position in the {family} list")
            }
            UnknownReason::NoCurrentPosition(family) => {
                write!(f, "current {family} position unknown; refusing to navigate")
            }
        }
    }
}

/// Errors surfaced by drivers and the switchboard
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// Requested or current position unresolvable; nothing was sent
    #[error("unknown channel {channel}: {reason}")]
    UnknownChannel {
        channel: LogicalChannel,
        reason: UnknownReason,
    },

    /// Launch, stop or key-event invocation failed
    #[error("external tool failure: {0}")]
    ExternalTool(#[from] ToolError),
}

impl ControlError {
    /// Whether the error is a refused navigation
    pub fn is_unknown_channel(&self) -> bool {
        matches!(self, ControlError::UnknownChannel { .. })
    }
}
