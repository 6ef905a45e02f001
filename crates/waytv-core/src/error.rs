//! Error types for the channel registry and digit map

use thiserror::Error;

/// Errors raised while building or parsing registry data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Keypad digits are 0-9
    #[error("invalid keypad digit: {0} (expected 0-9)")]
    InvalidDigit(u8),

    /// Channel name not present in the registry
    #[error("unknown channel name: {0}")]
    UnknownChannelName(String),
}
