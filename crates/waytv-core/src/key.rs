//! Android key events synthesized by the remote

use std::fmt;

/// A key event understood by `input keyevent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyCode {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    DpadCenter,
    Back,
}

impl KeyCode {
    /// Symbolic Android key code name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCode::DpadUp => "KEYCODE_DPAD_UP",
            KeyCode::DpadDown => "KEYCODE_DPAD_DOWN",
            KeyCode::DpadLeft => "KEYCODE_DPAD_LEFT",
            KeyCode::DpadRight => "KEYCODE_DPAD_RIGHT",
            KeyCode::DpadCenter => "KEYCODE_DPAD_CENTER",
            KeyCode::Back => "KEYCODE_BACK",
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manual d-pad direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The d-pad key for this direction
    pub fn key(&self) -> KeyCode {
        match self {
            Direction::Up => KeyCode::DpadUp,
            Direction::Down => KeyCode::DpadDown,
            Direction::Left => KeyCode::DpadLeft,
            Direction::Right => KeyCode::DpadRight,
        }
    }
}
