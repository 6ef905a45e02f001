//! Symbolic commands decoded from the keypad and the terminal

use crate::key::Direction;

/// One operator command
///
/// The keypad and the terminal decode into the same set so the dispatcher
/// treats both sources identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Start the Android session and connect the bridge
    Start,
    /// Stop the active application and the session
    Stop,
    /// Select the channel mapped to a keypad digit
    SelectDigit(u8),
    /// Wrap-around successor in digit-map order
    NextChannel,
    /// Wrap-around predecessor in digit-map order
    PreviousChannel,
    /// Single raw d-pad event for manual correction
    Nudge(Direction),
    /// Commit the highlighted entry
    Confirm,
    /// Android back
    Back,
    /// Stop both input loops and exit
    Quit,
}

impl Command {
    /// Whether this command ends the session of the input loops
    pub fn is_quit(&self) -> bool {
        matches!(self, Command::Quit)
    }

    /// Whether the command changes channel and so needs a live bridge
    pub fn needs_bridge(&self) -> bool {
        matches!(
            self,
            Command::SelectDigit(_) | Command::NextChannel | Command::PreviousChannel
        )
    }
}
