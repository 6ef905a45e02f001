//! Events emitted by the dispatcher for the operator surface

use waytv_core::{AppFamily, LogicalChannel};

/// Unified event stream of the control layer
///
/// The binary prints these; tests collect them to observe what the
/// dispatcher decided without looking at the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// Informational message for the operator
    Notice {
        message: String,
    },

    /// A channel was selected successfully
    ChannelChanged {
        /// Selected channel
        channel: LogicalChannel,
        /// Family now on screen
        family: AppFamily,
        /// Digit the channel is mapped to, if any
        digit: Option<u8>,
    },

    /// The application in the active slot changed
    ActiveFamilyChanged {
        /// Previous family (None if the slot was empty)
        from: Option<AppFamily>,
        /// New family (None if the slot was cleared)
        to: Option<AppFamily>,
    },

    /// A command failed
    Error {
        /// Component that failed (e.g. "Session", "Switchboard")
        source: String,
        /// Error message
        message: String,
    },
}

impl ControlEvent {
    pub fn notice(message: impl Into<String>) -> Self {
        ControlEvent::Notice {
            message: message.into(),
        }
    }

    pub fn error(source: impl Into<String>, message: impl ToString) -> Self {
        ControlEvent::Error {
            source: source.into(),
            message: message.to_string(),
        }
    }
}
