//! Error types for the input layer

use thiserror::Error;

/// Errors raised while opening or polling input sources
#[derive(Debug, Error)]
pub enum InputError {
    /// Exclusive grab refused; the device is still polled, shared with others
    #[error("failed to grab {path}: {reason}")]
    DeviceGrabFailed { path: String, reason: String },

    /// Device node could not be opened
    #[error("failed to open {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    /// Device directory could not be listed
    #[error("failed to enumerate {dir}: {reason}")]
    EnumerationFailed { dir: String, reason: String },

    /// Not a single device could be opened
    #[error("no input sources could be opened")]
    NoInputSources,

    /// Creating or waiting on the readiness poller failed
    #[error("poll failed: {0}")]
    Poll(String),

    /// Reading the terminal failed
    #[error("terminal read failed: {0}")]
    TerminalRead(String),
}

/// Why a terminal line was not turned into a command
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineError {
    /// A number outside the keypad digits
    #[error("channel number {0} out of range (0-9)")]
    OutOfRange(String),

    /// Anything else
    #[error("unknown input {0:?}")]
    Unknown(String),
}
